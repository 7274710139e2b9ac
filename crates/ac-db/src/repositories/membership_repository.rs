use crate::acl::apply_claims_filter;
use crate::repositories::truncate_to_millis;
use crate::{DbError, Result};

use std::panic::Location;
use std::str::FromStr;

use ac_auth::Claims;
use ac_core::{
    Membership, MembershipArchiveRequest, MembershipCreateRequest, MembershipDeleteRequest,
    MembershipFindRequest, MembershipReadRequest, MembershipStatus, MembershipUpdateRequest, Role,
};
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

const MEMBERSHIP_COLUMNS: &str =
    "id, user_id, account_id, roles, status, created_at, updated_at, archived_at";

pub struct MembershipRepository {
    pool: SqlitePool,
}

#[track_caller]
fn map_row(row: &SqliteRow) -> Result<Membership> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let account_id: String = row.try_get("account_id")?;
    let roles: String = row.try_get("roles")?;
    let status: String = row.try_get("status")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;
    let archived_at: Option<i64> = row.try_get("archived_at")?;

    Ok(Membership {
        id: parse_uuid(&id, "users_accounts.id")?,
        user_id: parse_uuid(&user_id, "users_accounts.user_id")?,
        account_id: parse_uuid(&account_id, "users_accounts.account_id")?,
        roles: serde_json::from_str(&roles).map_err(|e| DbError::Initialization {
            message: format!("Invalid roles in users_accounts.roles: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        status: MembershipStatus::from_str(&status)?,
        created_at: parse_millis(created_at, "users_accounts.created_at")?,
        updated_at: parse_millis(updated_at, "users_accounts.updated_at")?,
        archived_at: archived_at
            .map(|at| parse_millis(at, "users_accounts.archived_at"))
            .transpose()?,
    })
}

#[track_caller]
fn parse_uuid(value: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| DbError::Initialization {
        message: format!("Invalid UUID in {}: {}", column, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn parse_millis(value: i64, column: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| DbError::Initialization {
        message: format!("Invalid timestamp in {}", column),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn roles_to_json(roles: &[Role]) -> Result<String> {
    serde_json::to_string(roles).map_err(|e| DbError::Initialization {
        message: format!("Failed to encode roles: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

impl MembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Determines if the claims may see the specified account. Internal
    /// calls (no tenant scope) and calls already scoped to the account pass
    /// outright; anything else requires an unarchived membership of the
    /// target account for the subject.
    pub async fn can_read_account(&self, claims: &Claims, account_id: Uuid) -> Result<()> {
        if claims.aud.is_empty() || claims.aud == account_id.to_string() {
            return Ok(());
        }

        let row = sqlx::query(
            "SELECT id FROM users_accounts \
             WHERE user_id = ? AND account_id = ? AND archived_at IS NULL",
        )
        .bind(claims.sub.clone())
        .bind(account_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbError::query(format!("check read access to account {}", account_id), e))?;

        match row {
            Some(_) => Ok(()),
            None => Err(DbError::forbidden()),
        }
    }

    /// `can_read_account` plus the admin role for authenticated callers.
    /// Internal flows pass empty claims and skip the role check.
    pub async fn can_modify_account(&self, claims: &Claims, account_id: Uuid) -> Result<()> {
        self.can_read_account(claims, account_id).await?;

        if claims.has_auth() && !claims.has_role(&[Role::Admin]) {
            return Err(DbError::forbidden());
        }

        Ok(())
    }

    /// Lists memberships matching the request. Caller-supplied predicates
    /// are always combined with the tenant ACL filter; archived rows are
    /// excluded unless the request opts in.
    pub async fn find(
        &self,
        claims: &Claims,
        req: &MembershipFindRequest,
    ) -> Result<Vec<Membership>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM users_accounts WHERE 1 = 1",
            MEMBERSHIP_COLUMNS
        ));

        if let Some(user_id) = req.user_id {
            query.push(" AND user_id = ");
            query.push_bind(user_id.to_string());
        }
        if let Some(account_id) = req.account_id {
            query.push(" AND account_id = ");
            query.push_bind(account_id.to_string());
        }
        if !req.include_archived {
            query.push(" AND archived_at IS NULL");
        }

        apply_claims_filter(&mut query, claims);

        if let Some(order_by) = req.order_by {
            query.push(" ORDER BY ");
            query.push(order_by.as_sql());
        }
        match (req.limit, req.offset) {
            (Some(limit), offset) => {
                query.push(" LIMIT ");
                query.push_bind(limit);
                if let Some(offset) = offset {
                    query.push(" OFFSET ");
                    query.push_bind(offset);
                }
            }
            // SQLite requires a LIMIT clause before OFFSET.
            (None, Some(offset)) => {
                query.push(" LIMIT -1 OFFSET ");
                query.push_bind(offset);
            }
            (None, None) => {}
        }

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbError::query("find memberships", e))?;

        rows.iter().map(map_row).collect()
    }

    /// Every membership for the user. NotFound when the user has none.
    pub async fn find_by_user(
        &self,
        claims: &Claims,
        user_id: Uuid,
        include_archived: bool,
    ) -> Result<Vec<Membership>> {
        let req = MembershipFindRequest {
            user_id: Some(user_id),
            order_by: Some(ac_core::MembershipOrderBy::CreatedAt),
            include_archived,
            ..Default::default()
        };

        let found = self.find(claims, &req).await?;
        if found.is_empty() {
            return Err(DbError::not_found(format!(
                "no memberships for user {} found",
                user_id
            )));
        }

        Ok(found)
    }

    /// The membership for the (user, account) pair. Forbidden when the
    /// claims cannot see the account at all, NotFound when they can but no
    /// row matches — distinct kinds for logging; whether to collapse them
    /// externally is the transport layer's call.
    pub async fn read(&self, claims: &Claims, req: &MembershipReadRequest) -> Result<Membership> {
        self.can_read_account(claims, req.account_id).await?;

        let find = MembershipFindRequest {
            user_id: Some(req.user_id),
            account_id: Some(req.account_id),
            include_archived: req.include_archived,
            ..Default::default()
        };

        self.find(claims, &find)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DbError::not_found(format!(
                    "entry for user {} account {} not found",
                    req.user_id, req.account_id
                ))
            })
    }

    /// Grants a user membership of an account. If any row for the pair
    /// already exists — archived included — it is updated and revived
    /// instead of duplicated, so previously removed members reactivate
    /// cleanly and the unique (user_id, account_id) constraint never trips.
    pub async fn create(
        &self,
        claims: &Claims,
        req: &MembershipCreateRequest,
        now: DateTime<Utc>,
    ) -> Result<Membership> {
        req.validate()?;
        self.can_modify_account(claims, req.account_id).await?;

        let now = truncate_to_millis(now);

        let existing = self
            .find(
                claims,
                &MembershipFindRequest {
                    user_id: Some(req.user_id),
                    account_id: Some(req.account_id),
                    include_archived: true,
                    ..Default::default()
                },
            )
            .await?;

        if let Some(existing) = existing.into_iter().next() {
            let update = MembershipUpdateRequest {
                user_id: req.user_id,
                account_id: req.account_id,
                roles: Some(req.roles.clone()),
                status: req.status,
                unarchive: true,
            };
            self.update(claims, &update, now).await?;

            return Ok(Membership {
                roles: req.roles.clone(),
                status: req.status.unwrap_or(existing.status),
                updated_at: now,
                archived_at: None,
                ..existing
            });
        }

        let membership = Membership {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            account_id: req.account_id,
            roles: req.roles.clone(),
            status: req.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            archived_at: None,
        };

        sqlx::query(
            "INSERT INTO users_accounts \
             (id, user_id, account_id, roles, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(membership.id.to_string())
        .bind(membership.user_id.to_string())
        .bind(membership.account_id.to_string())
        .bind(roles_to_json(&membership.roles)?)
        .bind(membership.status.as_str())
        .bind(membership.created_at.timestamp_millis())
        .bind(membership.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::query(
                format!(
                    "add account {} to user {}",
                    req.account_id, req.user_id
                ),
                e,
            )
        })?;

        Ok(membership)
    }

    /// Partially updates the membership for the (user, account) pair. A
    /// request with nothing to change succeeds without touching the store.
    pub async fn update(
        &self,
        claims: &Claims,
        req: &MembershipUpdateRequest,
        now: DateTime<Utc>,
    ) -> Result<()> {
        req.validate()?;
        self.can_modify_account(claims, req.account_id).await?;

        if req.is_empty() {
            return Ok(());
        }

        let now = truncate_to_millis(now);

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE users_accounts SET ");
        {
            let mut fields = query.separated(", ");
            if let Some(roles) = &req.roles {
                fields.push("roles = ");
                fields.push_bind_unseparated(roles_to_json(roles)?);
            }
            if let Some(status) = req.status {
                fields.push("status = ");
                fields.push_bind_unseparated(status.as_str().to_string());
            }
            if req.unarchive {
                fields.push("archived_at = NULL");
            }
            fields.push("updated_at = ");
            fields.push_bind_unseparated(now.timestamp_millis());
        }
        query.push(" WHERE user_id = ");
        query.push_bind(req.user_id.to_string());
        query.push(" AND account_id = ");
        query.push_bind(req.account_id.to_string());

        query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DbError::query(
                    format!(
                        "update account {} for user {}",
                        req.account_id, req.user_id
                    ),
                    e,
                )
            })?;

        Ok(())
    }

    /// Soft delete: stamps `archived_at`, leaving the row recoverable via
    /// a subsequent create.
    pub async fn archive(
        &self,
        claims: &Claims,
        req: &MembershipArchiveRequest,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.can_modify_account(claims, req.account_id).await?;

        let now = truncate_to_millis(now);

        sqlx::query(
            "UPDATE users_accounts SET archived_at = ? \
             WHERE user_id = ? AND account_id = ?",
        )
        .bind(now.timestamp_millis())
        .bind(req.user_id.to_string())
        .bind(req.account_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::query(
                format!(
                    "archive account {} from user {}",
                    req.account_id, req.user_id
                ),
                e,
            )
        })?;

        Ok(())
    }

    /// Hard removal, reserved for privileged internal flows: any
    /// authenticated caller must hold the admin role, on top of the usual
    /// modify check. Irreversible — prefer `archive`.
    pub async fn delete(&self, claims: &Claims, req: &MembershipDeleteRequest) -> Result<()> {
        if claims.has_auth() && !claims.has_role(&[Role::Admin]) {
            return Err(DbError::forbidden());
        }
        self.can_modify_account(claims, req.account_id).await?;

        sqlx::query("DELETE FROM users_accounts WHERE user_id = ? AND account_id = ?")
            .bind(req.user_id.to_string())
            .bind(req.account_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DbError::query(
                    format!(
                        "delete account {} for user {}",
                        req.account_id, req.user_id
                    ),
                    e,
                )
            })?;

        Ok(())
    }
}
