use ac_auth::{ClaimPreferences, Claims};
use chrono::{TimeDelta, Utc};
use uuid::Uuid;

/// Claims for an admin rooted at the given account
pub fn admin_claims(user_id: Uuid, account_id: Uuid) -> Claims {
    Claims::new(
        &user_id.to_string(),
        &account_id.to_string(),
        vec![account_id.to_string()],
        vec!["admin".to_string()],
        ClaimPreferences::default(),
        Utc::now(),
        TimeDelta::hours(1),
    )
}

/// Claims for a plain user rooted at the given account
pub fn user_claims(user_id: Uuid, account_id: Uuid) -> Claims {
    Claims::new(
        &user_id.to_string(),
        &account_id.to_string(),
        vec![account_id.to_string()],
        vec!["user".to_string()],
        ClaimPreferences::default(),
        Utc::now(),
        TimeDelta::hours(1),
    )
}

/// Empty claims for system-initiated operations
pub fn internal_claims() -> Claims {
    Claims::default()
}
