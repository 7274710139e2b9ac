pub mod invite_repository;
pub mod membership_repository;
pub mod user_repository;

use chrono::{DateTime, Utc};

/// The store keeps millisecond precision; truncating before a write keeps
/// returned values identical to what is persisted.
pub(crate) fn truncate_to_millis(now: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
