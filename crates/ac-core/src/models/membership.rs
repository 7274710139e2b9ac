use crate::{MembershipStatus, Role};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Associates one user with one account. The (user_id, account_id) pair is
/// unique in storage; removal is a soft delete via `archived_at` unless an
/// explicit hard delete is requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub roles: Vec<Role>,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn new(
        user_id: Uuid,
        account_id: Uuid,
        roles: Vec<Role>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            roles,
            status: MembershipStatus::Active,
            created_at: now,
            updated_at: now,
            archived_at: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}
