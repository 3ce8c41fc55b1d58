//! User administration endpoints.
//!
//! ```text
//! GET /api/users
//! GET /api/users/by-email?email=ada@example.com
//! PUT /api/users/7 {"verified":true}
//! POST /api/users/7/add-permission {"permission":"manage_team"}
//! ```
//!
//! Mutations other than `PUT /api/users/{id}` answer 204.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use zeroize::Zeroizing;

use crate::domain::{ApiResult, AuthenticatedUser, Error, UserChanges, UserId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::user_dto::{AddressRequest, UserResponse};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub verified: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone: request.phone,
            role: request.role,
            verified: request.verified,
        }
    }
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct SetPasswordRequest {
    pub password: String,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PermissionRequest {
    pub permission: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RemoveAddressRequest {
    pub address_id: i64,
}

/// `?email=` query used by lookup and verification routes.
#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct EmailQuery {
    pub email: String,
}

fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.accounts.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/by-email",
    params(EmailQuery),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 400, description = "Invalid email", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserByEmail"
)]
#[get("/users/by-email")]
pub async fn get_user_by_email(
    state: web::Data<HttpState>,
    query: web::Query<EmailQuery>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.find_by_email(&query.email).await?;
    Ok(web::Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/users/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "resetPassword"
)]
#[post("/users/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ResetPasswordRequest { email, password } = payload.into_inner();
    let password = Zeroizing::new(password);
    state.accounts.reset_password(&email, &password).await?;
    info!(actor = %caller.user_id(), "password reset by email");
    Ok(no_content())
}

#[utoipa::path(
    post,
    path = "/api/users/verify",
    params(EmailQuery),
    responses(
        (status = 204, description = "Account marked verified"),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "verifyUser"
)]
#[post("/users/verify")]
pub async fn verify_user(
    state: web::Data<HttpState>,
    query: web::Query<EmailQuery>,
) -> ApiResult<HttpResponse> {
    state.accounts.set_verified(&query.email, true).await?;
    Ok(no_content())
}

#[utoipa::path(
    post,
    path = "/api/users/unverify",
    params(EmailQuery),
    responses(
        (status = 204, description = "Account marked unverified"),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "unverifyUser"
)]
#[post("/users/unverify")]
pub async fn unverify_user(
    state: web::Data<HttpState>,
    query: web::Query<EmailQuery>,
) -> ApiResult<HttpResponse> {
    state.accounts.set_verified(&query.email, false).await?;
    Ok(no_content())
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.get_user(UserId::new(id.into_inner())).await?;
    Ok(web::Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .accounts
        .update_user(UserId::new(id.into_inner()), payload.into_inner().into())
        .await?;
    Ok(web::Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "User not found", body = Error),
        (status = 409, description = "Account still referenced", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(id.into_inner());
    state.accounts.delete_user(id).await?;
    info!(actor = %caller.user_id(), user_id = %id, "account deleted");
    Ok(no_content())
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "setUserPassword"
)]
#[put("/users/{id}/password")]
pub async fn set_password(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<i64>,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(id.into_inner());
    let password = Zeroizing::new(payload.into_inner().password);
    state.accounts.set_password(id, &password).await?;
    info!(actor = %caller.user_id(), user_id = %id, "password set by administrator");
    Ok(no_content())
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/add-role",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = RoleRequest,
    responses(
        (status = 204, description = "Role assigned"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "addRole"
)]
#[post("/users/{id}/add-role")]
pub async fn add_role(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .add_role(UserId::new(id.into_inner()), &payload.role)
        .await?;
    Ok(no_content())
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/remove-role",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Role cleared"),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "removeRole"
)]
#[delete("/users/{id}/remove-role")]
pub async fn remove_role(state: web::Data<HttpState>, id: web::Path<i64>) -> ApiResult<HttpResponse> {
    state.accounts.remove_role(UserId::new(id.into_inner())).await?;
    Ok(no_content())
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/add-permission",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = PermissionRequest,
    responses(
        (status = 204, description = "Permission granted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "addPermission"
)]
#[post("/users/{id}/add-permission")]
pub async fn add_permission(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<PermissionRequest>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .add_permission(UserId::new(id.into_inner()), &payload.permission)
        .await?;
    Ok(no_content())
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/remove-permission",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = PermissionRequest,
    responses(
        (status = 204, description = "Permission removed, or was never granted"),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "removePermission"
)]
#[delete("/users/{id}/remove-permission")]
pub async fn remove_permission(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<PermissionRequest>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .remove_permission(UserId::new(id.into_inner()), &payload.permission)
        .await?;
    Ok(no_content())
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/add-address",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = AddressRequest,
    responses(
        (status = 204, description = "Address attached"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "addAddress"
)]
#[post("/users/{id}/add-address")]
pub async fn add_address(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<AddressRequest>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .add_address(UserId::new(id.into_inner()), payload.into_inner().into())
        .await?;
    Ok(no_content())
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/remove-address",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = RemoveAddressRequest,
    responses(
        (status = 204, description = "Address removed"),
        (status = 404, description = "Address not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "removeAddress"
)]
#[delete("/users/{id}/remove-address")]
pub async fn remove_address(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<RemoveAddressRequest>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .remove_address(UserId::new(id.into_inner()), payload.address_id)
        .await?;
    Ok(no_content())
}

/// Register the user routes on a guarded scope.
///
/// Literal paths go first so `/users/by-email` is never read as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user_by_email)
        .service(reset_password)
        .service(verify_user)
        .service(unverify_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(set_password)
        .service(add_role)
        .service(remove_role)
        .service(add_permission)
        .service(remove_permission)
        .service(add_address)
        .service(remove_address);
}
