use crate::{AuthError, Claims, Result, TokenCodec};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// The payload delivered to a caller after successful credential
/// verification or an account switch. Stateless once minted; revocation
/// happens only through natural expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The signed, encoded claims.
    pub access_token: String,
    pub token_type: String,
    /// Convenience copies of the claims validity window.
    pub expiry: DateTime<Utc>,
    /// Remaining lifetime at mint time, in seconds.
    pub ttl: i64,
    /// Denormalized for client convenience.
    pub user_id: String,
    pub account_id: String,
}

impl AccessToken {
    /// Signs the claims through the codec and packages the result.
    #[track_caller]
    pub fn issue(codec: &dyn TokenCodec, claims: &Claims) -> Result<Self> {
        let access_token = codec.generate_token(claims)?;

        let expiry = DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| {
            AuthError::InvalidClaims {
                message: format!("exp {} out of range", claims.exp),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expiry,
            ttl: claims.exp - claims.iat,
            user_id: claims.sub.clone(),
            account_id: claims.aud.clone(),
        })
    }

    /// The `Authorization` header value for this token.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", TOKEN_TYPE_BEARER, self.access_token)
    }
}
