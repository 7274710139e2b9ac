use crate::{Membership, MembershipStatus, Role};

use chrono::Utc;
use uuid::Uuid;

#[test]
fn test_membership_new_defaults() {
    let user_id = Uuid::new_v4();
    let account_id = Uuid::new_v4();
    let now = Utc::now();

    let m = Membership::new(user_id, account_id, vec![Role::User], now);

    assert_eq!(m.user_id, user_id);
    assert_eq!(m.account_id, account_id);
    assert_eq!(m.status, MembershipStatus::Active);
    assert_eq!(m.created_at, now);
    assert_eq!(m.updated_at, now);
    assert!(m.archived_at.is_none());
    assert!(!m.is_archived());
}

#[test]
fn test_membership_has_role() {
    let m = Membership::new(Uuid::new_v4(), Uuid::new_v4(), vec![Role::User], Utc::now());

    assert!(m.has_role(Role::User));
    assert!(!m.has_role(Role::Admin));
}
