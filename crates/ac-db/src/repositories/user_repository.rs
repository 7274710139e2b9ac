use crate::repositories::truncate_to_millis;
use crate::{DbError, Result};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use validator::ValidateEmail;

/// Minimal user directory entry: just enough identity for the invite flow
/// to create a new user or attach an existing one. Credentials live with
/// the external verifier, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreateRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserCreateRequest {
    #[track_caller]
    pub fn validate(&self) -> Result<()> {
        if !self.email.validate_email() {
            return Err(DbError::validation(format!(
                "invalid email {:?}",
                self.email
            )));
        }
        Ok(())
    }
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, created_at, updated_at, archived_at";

pub struct UserRepository {
    pool: SqlitePool,
}

fn map_row(row: &SqliteRow) -> Result<User> {
    let id: String = row.try_get("id")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;
    let archived_at: Option<i64> = row.try_get("archived_at")?;

    let timestamp = |at: i64, column: &str| {
        DateTime::from_timestamp_millis(at).ok_or_else(|| DbError::Initialization {
            message: format!("Invalid timestamp in {}", column),
            location: ErrorLocation::from(Location::caller()),
        })
    };

    Ok(User {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Initialization {
            message: format!("Invalid UUID in users.id: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        created_at: timestamp(created_at, "users.created_at")?,
        updated_at: timestamp(updated_at, "users.updated_at")?,
        archived_at: archived_at
            .map(|at| timestamp(at, "users.archived_at"))
            .transpose()?,
    })
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbError::query(format!("find user by email {:?}", email), e))?;

        row.as_ref().map(map_row).transpose()
    }

    pub async fn read(&self, user_id: Uuid) -> Result<User> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::query(format!("read user {}", user_id), e))?;

        row.as_ref()
            .map(map_row)
            .transpose()?
            .ok_or_else(|| DbError::not_found(format!("user {} not found", user_id)))
    }

    pub async fn create(&self, req: &UserCreateRequest, now: DateTime<Utc>) -> Result<User> {
        req.validate()?;

        let now = truncate_to_millis(now);
        let user = User {
            id: Uuid::new_v4(),
            email: req.email.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            created_at: now,
            updated_at: now,
            archived_at: None,
        };

        sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(user.email.clone())
        .bind(user.first_name.clone())
        .bind(user.last_name.clone())
        .bind(user.created_at.timestamp_millis())
        .bind(user.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::query(format!("create user {:?}", req.email), e))?;

        Ok(user)
    }
}
