use crate::{DEFAULT_INVITE_TTL_SECS, DEFAULT_TOKEN_TTL_SECS};

use serde::Deserialize;

/// Secrets and lifetimes for the token and invite codecs. Secrets have no
/// defaults; they must come from config or environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens.
    pub token_secret: Option<String>,
    /// Pre-shared secret for invite encryption.
    pub invite_secret: Option<String>,
    pub token_ttl_secs: u64,
    pub invite_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            invite_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            invite_ttl_secs: DEFAULT_INVITE_TTL_SECS,
        }
    }
}
