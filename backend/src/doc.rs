//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the annotated handlers from the inbound layer and the
//! request/response schemas, and declares the bearer token scheme that guards
//! everything outside `/api/auth` and `/health`.
//!
//! The document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::resources::{
    Inventory, InventoryDraft, InventoryPatch, Item, ItemDraft, ItemPatch, Order, OrderDraft,
    OrderPatch, Product, ProductDraft, ProductPatch, Shipment, ShipmentDraft, ShipmentPatch,
    Supplier, SupplierDraft, SupplierPatch, Vendor, VendorDraft, VendorPatch,
};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::inbound::http::profile::{ChangePasswordRequest, ProfileUpdateRequest};
use crate::inbound::http::user_dto::{AddressRequest, AddressResponse, UserResponse};
use crate::inbound::http::users::{
    PermissionRequest, RemoveAddressRequest, ResetPasswordRequest, RoleRequest,
    SetPasswordRequest, UpdateUserRequest,
};

/// Name of the security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer JWT security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Inventory backend API",
        description = "Supply-chain records, user accounts and token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::profile::change_password,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user_by_email,
        crate::inbound::http::users::reset_password,
        crate::inbound::http::users::verify_user,
        crate::inbound::http::users::unverify_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::set_password,
        crate::inbound::http::users::add_role,
        crate::inbound::http::users::remove_role,
        crate::inbound::http::users::add_permission,
        crate::inbound::http::users::remove_permission,
        crate::inbound::http::users::add_address,
        crate::inbound::http::users::remove_address,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        ProfileUpdateRequest,
        ChangePasswordRequest,
        UserResponse,
        AddressResponse,
        AddressRequest,
        UpdateUserRequest,
        SetPasswordRequest,
        ResetPasswordRequest,
        RoleRequest,
        PermissionRequest,
        RemoveAddressRequest,
        Inventory,
        InventoryDraft,
        InventoryPatch,
        Item,
        ItemDraft,
        ItemPatch,
        Product,
        ProductDraft,
        ProductPatch,
        Order,
        OrderDraft,
        OrderPatch,
        Shipment,
        ShipmentDraft,
        ShipmentPatch,
        Supplier,
        SupplierDraft,
        SupplierPatch,
        Vendor,
        VendorDraft,
        VendorPatch,
    )),
    tags(
        (name = "auth", description = "Registration and token issue"),
        (name = "profile", description = "The caller's own account"),
        (name = "users", description = "Account administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
