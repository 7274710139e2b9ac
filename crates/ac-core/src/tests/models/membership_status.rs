use crate::MembershipStatus;

use std::str::FromStr;

#[test]
fn test_membership_status_as_str() {
    assert_eq!(MembershipStatus::Active.as_str(), "active");
    assert_eq!(MembershipStatus::Pending.as_str(), "pending");
    assert_eq!(MembershipStatus::Disabled.as_str(), "disabled");
}

#[test]
fn test_membership_status_from_str() {
    assert_eq!(
        MembershipStatus::from_str("active").unwrap(),
        MembershipStatus::Active
    );
    assert_eq!(
        MembershipStatus::from_str("pending").unwrap(),
        MembershipStatus::Pending
    );
    assert_eq!(
        MembershipStatus::from_str("disabled").unwrap(),
        MembershipStatus::Disabled
    );
    assert!(MembershipStatus::from_str("archived").is_err());
}

#[test]
fn test_membership_status_default() {
    assert_eq!(MembershipStatus::default(), MembershipStatus::Active);
}
