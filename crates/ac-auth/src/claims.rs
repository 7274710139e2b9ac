use crate::{AuthError, ClaimPreferences, Result};

use std::panic::Location;
use std::str::FromStr;

use ac_core::Role;
use chrono::{DateTime, TimeDelta, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Tolerated clock skew between the issuer and the verifier, in seconds.
pub const CLOCK_SKEW_LEEWAY_SECS: i64 = 30;

/// The authorization claims transmitted via a signed token.
///
/// `sub`/`aud` mirror `root_user_id`/`root_account_id`: the standard claim
/// fields are what generic JWT tooling inspects, the named fields are what
/// our own consumers read.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub root_user_id: String,
    pub root_account_id: String,
    /// Every account the user may switch into.
    #[serde(rename = "accounts")]
    pub account_ids: Vec<String>,
    pub roles: Vec<String>,
    #[serde(rename = "prefs", default)]
    pub preferences: ClaimPreferences,
    /// Subject (user ID).
    pub sub: String,
    /// Audience: the tenant account active for this session.
    pub aud: String,
    /// Expiration timestamp (Unix).
    pub exp: i64,
    /// Issued-at timestamp (Unix).
    pub iat: i64,
}

impl Claims {
    /// Packages identity, tenancy, and roles into a claims value valid for
    /// `ttl` from `now`. Performs no authorization decision itself; scope
    /// and roles are copied verbatim from the caller.
    pub fn new(
        user_id: &str,
        account_id: &str,
        account_ids: Vec<String>,
        roles: Vec<String>,
        preferences: ClaimPreferences,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            root_user_id: user_id.to_string(),
            root_account_id: account_id.to_string(),
            account_ids,
            roles,
            preferences,
            sub: user_id.to_string(),
            aud: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Rejects any role tag outside the closed enumeration.
    #[track_caller]
    pub fn validate_roles(&self) -> Result<()> {
        for role in &self.roles {
            if Role::from_str(role).is_err() {
                return Err(AuthError::InvalidClaims {
                    message: format!("invalid role {:?}", role),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
        Ok(())
    }

    /// Full validity check against the supplied instant: closed role set,
    /// `exp` strictly in the future, `iat` not in the future beyond the
    /// clock-skew leeway.
    #[track_caller]
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<()> {
        self.validate_roles()?;

        if self.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.iat > now.timestamp() + CLOCK_SKEW_LEEWAY_SECS {
            return Err(AuthError::InvalidClaims {
                message: "issued in the future".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// True when the claims identify an authenticated caller. Internal
    /// system calls are made with `Claims::default()` and return false.
    pub fn has_auth(&self) -> bool {
        !self.sub.is_empty()
    }

    /// True when the claims carry at least one of the candidate roles.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.roles
            .iter()
            .any(|has| roles.iter().any(|want| has == want.as_str()))
    }
}
