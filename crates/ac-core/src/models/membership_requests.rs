use crate::{CoreError, MembershipStatus, Result, Role};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to grant a user membership of an account. If a membership for the
/// pair already exists (archived or not) the repository revives it instead of
/// inserting a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipCreateRequest {
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub roles: Vec<Role>,
    #[serde(default)]
    pub status: Option<MembershipStatus>,
}

impl MembershipCreateRequest {
    #[track_caller]
    pub fn validate(&self) -> Result<()> {
        if self.roles.is_empty() {
            return Err(CoreError::Validation {
                message: "roles cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipReadRequest {
    pub user_id: Uuid,
    pub account_id: Uuid,
    #[serde(default)]
    pub include_archived: bool,
}

/// Partial update of a membership. Leaving every optional field unset is a
/// no-op success, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipUpdateRequest {
    pub user_id: Uuid,
    pub account_id: Uuid,
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
    #[serde(default)]
    pub status: Option<MembershipStatus>,
    /// Clears `archived_at`. Never deserialized; only internal revive flows
    /// (create over an archived row, invite acceptance) set this.
    #[serde(skip)]
    pub unarchive: bool,
}

impl MembershipUpdateRequest {
    pub fn new(user_id: Uuid, account_id: Uuid) -> Self {
        Self {
            user_id,
            account_id,
            roles: None,
            status: None,
            unarchive: false,
        }
    }

    /// True when there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.roles.is_none() && self.status.is_none() && !self.unarchive
    }

    #[track_caller]
    pub fn validate(&self) -> Result<()> {
        if let Some(roles) = &self.roles
            && roles.is_empty()
        {
            return Err(CoreError::Validation {
                message: "roles cannot be set to an empty list".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipArchiveRequest {
    pub user_id: Uuid,
    pub account_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipDeleteRequest {
    pub user_id: Uuid,
    pub account_id: Uuid,
}

/// Sort column for membership find requests. An enum rather than a raw SQL
/// fragment so callers cannot inject arbitrary ORDER BY expressions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MembershipOrderBy {
    CreatedAt,
    UpdatedAt,
}

impl MembershipOrderBy {
    pub fn as_sql(&self) -> &str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Caller-supplied filter predicates for listing memberships. The tenant ACL
/// filter is always applied on top of these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipFindRequest {
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub order_by: Option<MembershipOrderBy>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub include_archived: bool,
}
