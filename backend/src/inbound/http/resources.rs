//! CRUD endpoints shared by every supply-chain resource kind.
//!
//! ```text
//! POST   /api/vendors {"name":"Acme"}
//! GET    /api/items?category=tools&min_price=10
//! GET    /api/orders/3
//! PUT    /api/orders/3 {"status":"shipped"}
//! DELETE /api/orders/3
//! ```
//!
//! One generic handler set serves all kinds; [`RestResource`] maps a kind to
//! its path segment and its service in [`HttpState`].

use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::resources::{Inventory, Item, Order, Product, Shipment, Supplier, Vendor};
use crate::domain::{ApiResult, AuthenticatedUser, Resource, ResourceService};
use crate::inbound::http::state::HttpState;

/// A resource kind exposed under `/api/<PATH>`.
pub trait RestResource: Resource + Serialize {
    const PATH: &'static str;

    fn service(state: &HttpState) -> &ResourceService<Self>;
}

macro_rules! rest_resource {
    ($($resource:ty => $path:literal, $field:ident;)+) => {
        $(
            impl RestResource for $resource {
                const PATH: &'static str = $path;

                fn service(state: &HttpState) -> &ResourceService<Self> {
                    &state.$field
                }
            }
        )+
    };
}

rest_resource! {
    Inventory => "/inventory", inventory;
    Item => "/items", items;
    Product => "/products", products;
    Order => "/orders", orders;
    Shipment => "/shipments", shipments;
    Supplier => "/suppliers", suppliers;
    Vendor => "/vendors", vendors;
}

async fn create<R>(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<R::Draft>,
) -> ApiResult<HttpResponse>
where
    R: RestResource,
    R::Draft: DeserializeOwned,
{
    let created = R::service(&state).create(payload.into_inner()).await?;
    info!(kind = R::KIND, id = created.id(), actor = %caller.user_id(), "resource created");
    Ok(HttpResponse::Created().json(created))
}

async fn list<R>(
    state: web::Data<HttpState>,
    filter: web::Query<R::Filter>,
) -> ApiResult<web::Json<Vec<R>>>
where
    R: RestResource,
    R::Filter: DeserializeOwned,
{
    let records = R::service(&state).list(filter.into_inner()).await?;
    Ok(web::Json(records))
}

async fn get<R: RestResource>(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<R>> {
    let record = R::service(&state).get(id.into_inner()).await?;
    Ok(web::Json(record))
}

async fn update<R>(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<i64>,
    payload: web::Json<R::Patch>,
) -> ApiResult<web::Json<R>>
where
    R: RestResource,
    R::Patch: DeserializeOwned,
{
    let updated = R::service(&state)
        .update(id.into_inner(), payload.into_inner())
        .await?;
    info!(kind = R::KIND, id = updated.id(), actor = %caller.user_id(), "resource updated");
    Ok(web::Json(updated))
}

async fn delete<R: RestResource>(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = id.into_inner();
    R::service(&state).delete(id).await?;
    info!(kind = R::KIND, id, actor = %caller.user_id(), "resource deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// CRUD scope for one resource kind.
pub fn resource_scope<R>() -> actix_web::Scope
where
    R: RestResource,
    R::Draft: DeserializeOwned,
    R::Patch: DeserializeOwned,
    R::Filter: DeserializeOwned,
{
    web::scope(R::PATH)
        .route("", web::post().to(create::<R>))
        .route("", web::get().to(list::<R>))
        .route("/{id}", web::get().to(get::<R>))
        .route("/{id}", web::put().to(update::<R>))
        .route("/{id}", web::delete().to(delete::<R>))
}

/// Register every resource kind on a guarded scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(resource_scope::<Inventory>())
        .service(resource_scope::<Item>())
        .service(resource_scope::<Product>())
        .service(resource_scope::<Order>())
        .service(resource_scope::<Shipment>())
        .service(resource_scope::<Supplier>())
        .service(resource_scope::<Vendor>());
}
