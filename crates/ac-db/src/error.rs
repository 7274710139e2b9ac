use std::panic::Location;

use ac_auth::AuthError;
use ac_core::CoreError;
use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Query failed: {context}: {source} {location}")]
    Sqlx {
        context: String,
        #[source]
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Entity not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Attempted action is not allowed {location}")]
    Forbidden { location: ErrorLocation },

    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Notification failed: {message} {location}")]
    Notify {
        message: String,
        location: ErrorLocation,
    },

    #[error("Auth error: {source} {location}")]
    Auth {
        #[source]
        source: AuthError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Core {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },
}

impl DbError {
    /// Wraps a store failure with the operation that issued it.
    #[track_caller]
    pub fn query<S: Into<String>>(context: S, source: sqlx::Error) -> Self {
        Self::Sqlx {
            context: context.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn forbidden() -> Self {
        Self::Forbidden {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn initialization<S: Into<String>>(message: S) -> Self {
        Self::Initialization {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            context: "database error".to_string(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<AuthError> for DbError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        Self::Auth {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for DbError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        Self::Core {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
