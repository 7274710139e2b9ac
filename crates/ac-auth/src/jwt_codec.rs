use crate::{AuthError, Claims, Result, TokenCodec};

use std::panic::Location;

use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Production codec backed by `jsonwebtoken`.
pub struct JwtCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

fn base_validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 30; // 30 second clock skew tolerance
    // aud carries the active tenant ID, not a fixed audience list.
    validation.validate_aud = false;
    validation
}

impl JwtCodec {
    /// Create a codec with HS256 (symmetric secret).
    pub fn with_hs256(secret: &[u8]) -> Self {
        Self {
            header: Header::new(Algorithm::HS256),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: base_validation(Algorithm::HS256),
        }
    }

    /// Create a codec with RS256 (asymmetric key pair).
    #[track_caller]
    pub fn with_rs256(private_key_pem: &str, public_key_pem: &str) -> Result<Self> {
        let encoding_key =
            EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|e| {
                AuthError::Crypto {
                    message: format!("Invalid RSA private key: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;
        let decoding_key =
            DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(|e| {
                AuthError::Crypto {
                    message: format!("Invalid RSA public key: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        Ok(Self {
            header: Header::new(Algorithm::RS256),
            encoding_key,
            decoding_key,
            validation: base_validation(Algorithm::RS256),
        })
    }
}

impl TokenCodec for JwtCodec {
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
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    _ => AuthError::TokenMalformed {
                        source: e,
                        location: ErrorLocation::from(Location::caller()),
                    },
                }
            })?;

        // Signature and expiry verified; the role set still needs the
        // closed-enumeration check.
        token_data.claims.validate_roles()?;

        Ok(token_data.claims)
    }
}
