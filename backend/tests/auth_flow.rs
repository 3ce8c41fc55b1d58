//! End-to-end authentication behaviour over the full middleware stack.

mod support;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use support::{bearer, init_app, register_and_login};

#[derive(Clone, Copy, Debug)]
enum SignatureEnd {
    First,
    Last,
}

/// Swap one end of the signature segment for a different character.
fn tamper(token: &str, end: SignatureEnd) -> String {
    let (signed, signature) = token.rsplit_once('.').expect("three-part token");
    let swap = |c: char| if c == 'A' { 'B' } else { 'A' };
    let mut chars: Vec<char> = signature.chars().collect();
    let index = match end {
        SignatureEnd::First => 0,
        SignatureEnd::Last => chars.len() - 1,
    };
    chars[index] = swap(chars[index]);
    format!("{signed}.{}", chars.into_iter().collect::<String>())
}

#[rstest]
#[case(SignatureEnd::First)]
#[case(SignatureEnd::Last)]
#[actix_web::test]
async fn registered_user_reaches_the_profile_and_tampering_is_caught(#[case] end: SignatureEnd) {
    let app = init_app(|_| {}).await;
    let token = register_and_login(&app, "Ada@Example.com", "pw1").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = test::read_body_json(res).await;
    assert_eq!(profile["email"], "ada@example.com");
    assert_eq!(profile["role"], "user");
    assert!(profile.get("password").is_none());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(bearer(&tamper(&token, end)))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    let message = body["message"].as_str().expect("message");
    assert!(message.starts_with("Invalid token: "), "got {message}");
}

#[rstest]
#[case(None, "Authorization header is required")]
#[case(Some("Basic YWRhOnB3MQ=="), "Authorization token must be a Bearer token")]
#[case(Some("Bearer not.a.jwt"), "Invalid token: token is malformed")]
#[actix_web::test]
async fn rejections_carry_exact_messages(#[case] header: Option<&str>, #[case] expected: &str) {
    let app = init_app(|_| {}).await;
    let mut req = test::TestRequest::get().uri("/api/orders");
    if let Some(value) = header {
        req = req.insert_header((AUTHORIZATION, value));
    }

    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], expected);
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_conflicts() {
    let app = init_app(|_| {}).await;
    register_and_login(&app, "grace@example.com", "pw1").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"email": "GRACE@example.com", "password": "other"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "User with this email already exists");
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_unauthorised() {
    let app = init_app(|_| {}).await;
    register_and_login(&app, "linus@example.com", "pw1").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "linus@example.com", "password": "nope"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid password");
}

#[rstest]
#[actix_web::test]
async fn password_change_invalidates_the_old_secret() {
    let app = init_app(|_| {}).await;
    let token = register_and_login(&app, "barbara@example.com", "first").await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/profile/password")
            .insert_header(bearer(&token))
            .set_json(json!({"current_password": "first", "new_password": "second"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "barbara@example.com", "password": "first"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "barbara@example.com", "password": "second"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
