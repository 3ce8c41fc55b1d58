//! Tests for registration and login.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockCredentialHasher, MockTokenService, MockUserRepository, TokenError,
};
use crate::domain::UserId;

fn stored_user(id: i64, digest: &str) -> User {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid timestamp");
    User {
        id: UserId::new(id),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        password: PasswordDigest::new(digest),
        role: "user".to_owned(),
        verified: false,
        permissions: BTreeSet::new(),
        phone: String::new(),
        addresses: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

fn service(
    users: MockUserRepository,
    hasher: MockCredentialHasher,
    tokens: MockTokenService,
) -> AuthService {
    AuthService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
}

fn details() -> RegistrationDetails {
    RegistrationDetails::try_from_parts(Some("Ada"), "ada@example.com", "pw1", None, None)
        .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn register_stores_digest_and_default_permissions() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email == "ada@example.com")
        .times(1)
        .return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|new_user| {
            new_user.password.as_str() == "digest-of-pw1"
                && new_user.role == "user"
                && !new_user.verified
                && new_user.permissions.len() == DEFAULT_PERMISSIONS.len()
        })
        .times(1)
        .returning(|new_user| {
            let mut user = stored_user(1, new_user.password.as_str());
            user.permissions = new_user.permissions.clone();
            Ok(user)
        });
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .withf(|secret| secret == "pw1")
        .times(1)
        .returning(|_| Ok(PasswordDigest::new("digest-of-pw1")));

    let user = service(users, hasher, MockTokenService::new())
        .register(details())
        .await
        .expect("registration succeeds");

    assert_eq!(user.id, UserId::new(1));
    assert!(user.permissions.contains("manage_team"));
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_a_conflict_and_writes_nothing() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(stored_user(1, "x"))));
    users.expect_create().never();
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_hash().never();

    let err = service(users, hasher, MockTokenService::new())
        .register(details())
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "User with this email already exists");
}

#[rstest]
#[tokio::test]
async fn hashing_failure_is_internal() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users.expect_create().never();
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Err(CredentialHashError::hashing("params rejected")));

    let err = service(users, hasher, MockTokenService::new())
        .register(details())
        .await
        .expect_err("hash failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn racing_registration_maps_duplicate_to_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users
        .expect_create()
        .returning(|new_user| Err(UserPersistenceError::duplicate_email(new_user.email.clone())));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordDigest::new("d")));

    let err = service(users, hasher, MockTokenService::new())
        .register(details())
        .await
        .expect_err("duplicate insert");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("ada@example.com", password).expect("valid credentials")
}

#[rstest]
#[tokio::test]
async fn login_issues_token_for_matching_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(stored_user(5, "stored"))));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_verify()
        .withf(|secret, digest| secret == "pw1" && digest.as_str() == "stored")
        .returning(|_, _| Ok(true));
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .withf(|user_id, role| *user_id == UserId::new(5) && role == "user")
        .times(1)
        .returning(|_, _| {
            Ok(IssuedToken {
                token: "signed".to_owned(),
                expires_at: Utc::now(),
            })
        });

    let issued = service(users, hasher, tokens)
        .login(&credentials("pw1"))
        .await
        .expect("login succeeds");

    assert_eq!(issued.token, "signed");
}

#[rstest]
#[tokio::test]
async fn login_with_unknown_email_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));

    let err = service(users, MockCredentialHasher::new(), MockTokenService::new())
        .login(&credentials("pw1"))
        .await
        .expect_err("unknown email");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}

#[rstest]
#[tokio::test]
async fn wrong_password_is_unauthorized_and_issues_nothing() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(stored_user(5, "stored"))));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(false));
    let mut tokens = MockTokenService::new();
    tokens.expect_issue().never();

    let err = service(users, hasher, tokens)
        .login(&credentials("nope"))
        .await
        .expect_err("wrong password");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Invalid password");
}

#[rstest]
#[tokio::test]
async fn malformed_stored_digest_is_internal_not_unauthorized() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(stored_user(5, "garbage"))));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_verify()
        .returning(|_, _| Err(CredentialHashError::malformed("not a PHC string")));

    let err = service(users, hasher, MockTokenService::new())
        .login(&credentials("pw1"))
        .await
        .expect_err("malformed digest");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn token_failure_is_internal() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(stored_user(5, "stored"))));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(true));
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .returning(|_, _| Err(TokenError::signing("key rejected")));

    let err = service(users, hasher, tokens)
        .login(&credentials("pw1"))
        .await
        .expect_err("token failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Failed to generate token");
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let err = service(users, MockCredentialHasher::new(), MockTokenService::new())
        .login(&credentials("pw1"))
        .await
        .expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
