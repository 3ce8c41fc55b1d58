//! The authenticated caller's own account.
//!
//! ```text
//! GET /api/profile
//! PUT /api/profile {"name":"Ada"}
//! PUT /api/profile/password {"current_password":"old","new_password":"new"}
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{ApiResult, AuthenticatedUser, Error, ProfileChanges};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::user_dto::UserResponse;

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Caller's account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.profile(&caller).await?;
    Ok(web::Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let ProfileUpdateRequest { name, email, phone } = payload.into_inner();
    let user = state
        .accounts
        .update_profile(&caller, ProfileChanges { name, email, phone })
        .await?;
    Ok(web::Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/profile/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Current password is wrong", body = Error)
    ),
    tags = ["profile"],
    operation_id = "changeOwnPassword"
)]
#[put("/profile/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ChangePasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    let current_password = Zeroizing::new(current_password);
    let new_password = Zeroizing::new(new_password);
    state
        .accounts
        .change_own_password(&caller, &current_password, &new_password)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the profile routes on a guarded scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_profile)
        .service(change_password)
        .service(update_profile);
}
