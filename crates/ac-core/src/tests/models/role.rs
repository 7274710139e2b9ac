use crate::Role;

use std::str::FromStr;

#[test]
fn test_role_as_str() {
    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(Role::User.as_str(), "user");
}

#[test]
fn test_role_from_str() {
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert_eq!(Role::from_str("user").unwrap(), Role::User);
    assert!(Role::from_str("superuser").is_err());
    assert!(Role::from_str("").is_err());
}

#[test]
fn test_role_serde_round_trip() {
    let json = serde_json::to_string(&vec![Role::Admin, Role::User]).unwrap();
    assert_eq!(json, r#"["admin","user"]"#);

    let roles: Vec<Role> = serde_json::from_str(&json).unwrap();
    assert_eq!(roles, vec![Role::Admin, Role::User]);
}
