//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn user() -> User {
    let now = Utc::now();
    User {
        id: UserId::new(7),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        password: PasswordDigest::new("$argon2id$stub"),
        role: "user".to_owned(),
        verified: false,
        permissions: ["view_reports", "manage_team"]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        phone: String::new(),
        addresses: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[rstest]
fn revoke_permission_is_set_subtraction(mut user: User) {
    assert!(user.revoke_permission("manage_team"));
    assert!(!user.revoke_permission("manage_team"));
    assert_eq!(
        user.permissions.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["view_reports"]
    );
}

#[rstest]
fn grant_permission_keeps_lexical_order(mut user: User) {
    assert!(user.grant_permission("approve_transactions"));
    assert!(!user.grant_permission("approve_transactions"));
    let ordered: Vec<_> = user.permissions.iter().map(String::as_str).collect();
    assert_eq!(
        ordered,
        vec!["approve_transactions", "manage_team", "view_reports"]
    );
}

#[rstest]
fn empty_changes_touch_nothing(mut user: User) {
    let before = user.clone();
    assert!(!UserChanges::default().apply_to(&mut user));
    assert_eq!(user, before);
}

#[rstest]
fn changes_replace_only_supplied_fields(mut user: User) {
    let changes = UserChanges {
        phone: Some("555-0100".to_owned()),
        verified: Some(true),
        ..UserChanges::default()
    };
    assert!(changes.apply_to(&mut user));
    assert_eq!(user.phone, "555-0100");
    assert!(user.verified);
    assert_eq!(user.name, "Ada");
}

#[rstest]
fn user_id_serialises_as_plain_number() {
    let value = serde_json::to_value(UserId::new(42)).expect("serialises");
    assert_eq!(value, serde_json::json!(42));
}
