use crate::{AuthError, Claims, Result, TokenCodec};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

// Fixed signing key so tokens are reproducible across test runs.
const MEMORY_SIGNING_KEY: &[u8] = b"ac-auth-memory-codec-fixed-key!!";

/// Deterministic in-memory codec for tests: a fixed key and an injected
/// clock. The validity window is checked against the instant supplied at
/// construction instead of the system clock.
pub struct MemoryCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    now: DateTime<Utc>,
}

impl MemoryCodec {
    pub fn new(now: DateTime<Utc>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The window is enforced against the injected clock below, not by
        // the decoder.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Self {
            header: Header::new(Algorithm::HS256),
            encoding_key: EncodingKey::from_secret(MEMORY_SIGNING_KEY),
            decoding_key: DecodingKey::from_secret(MEMORY_SIGNING_KEY),
            validation,
            now,
        }
    }
}

impl TokenCodec for MemoryCodec {
    #[track_caller]
    fn generate_token(&self, claims: &Claims) -> Result<String> {
        claims.validate_roles()?;

        encode(&self.header, claims, &self.encoding_key).map_err(|e| AuthError::Crypto {
            message: format!("JWT encode failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn parse_claims(&self, token: &str) -> Result<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    _ => AuthError::TokenMalformed {
                        source: e,
                        location: ErrorLocation::from(Location::caller()),
                    },
                }
            })?;

        token_data.claims.validate_at(self.now)?;

        Ok(token_data.claims)
    }
}
