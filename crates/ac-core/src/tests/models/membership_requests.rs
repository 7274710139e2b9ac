use crate::{MembershipCreateRequest, MembershipUpdateRequest, Role};

use uuid::Uuid;

#[test]
fn test_create_request_requires_roles() {
    let req = MembershipCreateRequest {
        user_id: Uuid::new_v4(),
        account_id: Uuid::new_v4(),
        roles: vec![],
        status: None,
    };

    assert!(req.validate().is_err());
}

#[test]
fn test_create_request_with_roles_is_valid() {
    let req = MembershipCreateRequest {
        user_id: Uuid::new_v4(),
        account_id: Uuid::new_v4(),
        roles: vec![Role::User],
        status: None,
    };

    assert!(req.validate().is_ok());
}

#[test]
fn test_update_request_is_empty() {
    let req = MembershipUpdateRequest::new(Uuid::new_v4(), Uuid::new_v4());
    assert!(req.is_empty());

    let mut req = MembershipUpdateRequest::new(Uuid::new_v4(), Uuid::new_v4());
    req.roles = Some(vec![Role::Admin]);
    assert!(!req.is_empty());

    let mut req = MembershipUpdateRequest::new(Uuid::new_v4(), Uuid::new_v4());
    req.unarchive = true;
    assert!(!req.is_empty());
}

#[test]
fn test_update_request_rejects_empty_role_list() {
    let mut req = MembershipUpdateRequest::new(Uuid::new_v4(), Uuid::new_v4());
    req.roles = Some(vec![]);

    assert!(req.validate().is_err());
}

#[test]
fn test_update_request_unarchive_not_deserialized() {
    let json = r#"{"user_id":"d69bdef7-173f-4d29-b52c-3edc60baf6a2",
                   "account_id":"c4653bf9-5978-48b7-89c5-95704aebb7e2",
                   "unarchive":true}"#;

    let req: MembershipUpdateRequest = serde_json::from_str(json).unwrap();

    assert!(!req.unarchive);
}
