pub mod access_token;
pub mod claims;
pub mod error;
pub mod invite;
pub mod jwt_codec;
pub mod memory_codec;
pub mod preferences;
pub mod token_codec;

pub use access_token::{AccessToken, TOKEN_TYPE_BEARER};
pub use claims::Claims;
pub use error::{AuthError, Result};
pub use invite::{InviteHash, new_invite_hash, parse_invite_hash};
pub use jwt_codec::JwtCodec;
pub use memory_codec::MemoryCodec;
pub use preferences::ClaimPreferences;
pub use token_codec::TokenCodec;

#[cfg(test)]
mod tests;
