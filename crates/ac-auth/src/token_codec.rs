use crate::{Claims, Result};

/// Bidirectional mapping between a claims value and an opaque signed string.
///
/// Implementations are selected at construction time and must be immutable
/// afterwards so many requests can share one codec concurrently.
pub trait TokenCodec: Send + Sync {
    /// Serializes and signs the claims. Fails if the claims are structurally
    /// invalid (role outside the closed enumeration).
    fn generate_token(&self, claims: &Claims) -> Result<String>;

    /// Verifies the signature and decodes the payload. Errors distinguish a
    /// malformed token, a signature mismatch, an expired token, and
    /// structurally invalid claims.
    fn parse_claims(&self, token: &str) -> Result<Claims>;
}
