use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid claims: {message} {location}")]
    InvalidClaims {
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed token: {source} {location}")]
    TokenMalformed {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    #[error("Token signature invalid {location}")]
    TokenSignatureInvalid { location: ErrorLocation },

    #[error("Token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Invalid invite {location}")]
    InviteMalformed { location: ErrorLocation },

    #[error("Invite expired {location}")]
    InviteExpired { location: ErrorLocation },

    #[error("Crypto error: {message} {location}")]
    Crypto {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    /// Machine-readable code for client responses. Clients use
    /// `TOKEN_EXPIRED` to silently refresh instead of re-prompting for
    /// credentials.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidClaims { .. } => "INVALID_CLAIMS",
            Self::TokenMalformed { .. } => "TOKEN_MALFORMED",
            Self::TokenSignatureInvalid { .. } => "TOKEN_SIGNATURE_INVALID",
            Self::TokenExpired { .. } => "TOKEN_EXPIRED",
            Self::InviteMalformed { .. } => "INVITE_INVALID",
            Self::InviteExpired { .. } => "INVITE_EXPIRED",
            Self::Crypto { .. } => "CRYPTO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
