//! Public registration and login endpoints.
//!
//! ```text
//! POST /api/auth/register {"email":"ada@example.com","password":"pw"}
//! POST /api/auth/login {"email":"ada@example.com","password":"pw"}
//! ```

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, Error, LoginCredentials, RegistrationDetails};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::user_dto::UserResponse;

/// Body of `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    /// Defaults to `user` when missing or blank.
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Create an account with the default permission set.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let details = RegistrationDetails::try_from_parts(
        request.name.as_deref(),
        &request.email,
        &request.password,
        request.role.as_deref(),
        request.phone.as_deref(),
    )?;
    let user = state.auth.register(details).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Exchange credentials for a 24-hour bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid password", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)?;
    let issued = state.auth.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{json_config, test_state};

    async fn call(uri: &str, body: Value, state: web::Data<HttpState>) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(json_config())
                .service(web::scope("/api/auth").service(register).service(login)),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::post().uri(uri).set_json(body).to_request(),
        )
        .await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn register_then_login_issues_a_token() {
        let state = test_state();
        let (status, user) = call(
            "/api/auth/register",
            json!({"name": "Ada", "email": "Ada@Example.com", "password": "pw1"}),
            state.clone(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["email"], "ada@example.com");
        assert_eq!(user["role"], "user");
        assert!(user.get("password").is_none());

        let (status, body) = call(
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "pw1"}),
            state,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["expires_at"].is_string());
    }

    #[rstest]
    #[case(json!({"email": "nobody", "password": "pw"}), "email")]
    #[case(json!({"email": "a@b.com", "password": ""}), "password")]
    #[actix_web::test]
    async fn register_rejects_invalid_fields(#[case] body: Value, #[case] field: &str) {
        let (status, err) = call("/api/auth/register", body, test_state()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "invalid_request");
        assert_eq!(err["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_invalid_input() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .app_data(json_config())
                .service(web::scope("/api/auth").service(login)),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Error = test::read_body_json(res).await;
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Invalid input");
    }

    #[rstest]
    #[actix_web::test]
    async fn login_for_unknown_email_is_not_found() {
        let (status, err) = call(
            "/api/auth/login",
            json!({"email": "ghost@example.com", "password": "pw"}),
            test_state(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["message"], "User not found");
    }
}
