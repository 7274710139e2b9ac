use crate::{AuthError, Result};

use std::net::IpAddr;
use std::panic::Location;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const INVITE_FIELD_COUNT: usize = 5;
const NONCE_LEN: usize = 12;

/// The details embedded in an encrypted invite string: who invited, into
/// which account, over what window, and from which address. Reconstructed
/// from the string on every verification; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteHash {
    /// The inviting admin.
    pub user_id: Uuid,
    /// The account the invite grants access to.
    pub account_id: Uuid,
    pub created_at: i64,
    pub expires_at: i64,
    /// The inviter's address at creation time, kept for audit context.
    pub request_ip: IpAddr,
}

#[track_caller]
fn build_cipher(secret: &str) -> Result<Aes256Gcm> {
    let key = Sha256::digest(secret.as_bytes());
    Aes256Gcm::new_from_slice(&key).map_err(|e| AuthError::Crypto {
        message: format!("invite cipher setup failed: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Generates a new encrypted invite hash that is web safe for use in URLs.
///
/// The plaintext record is delimiter-joined; every field is typed (UUID,
/// digits, IP notation) so the delimiter cannot occur inside one. A fresh
/// nonce per call means two invites with identical fields still produce
/// different ciphertexts.
pub fn new_invite_hash(
    secret: &str,
    user_id: Uuid,
    account_id: Uuid,
    request_ip: IpAddr,
    ttl: TimeDelta,
    now: DateTime<Utc>,
) -> Result<String> {
    let created_at = now.timestamp();
    let expires_at = (now + ttl).timestamp();
    let plaintext = format!("{user_id}|{account_id}|{created_at}|{expires_at}|{request_ip}");

    let cipher = build_cipher(secret)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext =
        cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| AuthError::Crypto {
                message: "invite encryption failed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

    let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    raw.extend_from_slice(&nonce);
    raw.extend_from_slice(&ciphertext);

    Ok(URL_SAFE_NO_PAD.encode(raw))
}

/// Extracts the details encrypted in the hash string.
///
/// Every failure short of expiry — bad encoding, failed authentication,
/// wrong field count, malformed field — maps to the same generic invalid
/// error so the caller cannot be used as a decryption oracle. Expiry is a
/// distinct kind, checked only after the payload fully validates.
pub fn parse_invite_hash(
    secret: &str,
    encrypted: &str,
    now: DateTime<Utc>,
) -> Result<InviteHash> {
    let raw = URL_SAFE_NO_PAD
        .decode(encrypted)
        .map_err(|_| malformed())?;
    if raw.len() <= NONCE_LEN {
        return Err(malformed());
    }
    let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

    let plaintext = build_cipher(secret)?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| malformed())?;
    let plaintext = String::from_utf8(plaintext).map_err(|_| malformed())?;

    let parts: Vec<&str> = plaintext.split('|').collect();
    if parts.len() != INVITE_FIELD_COUNT {
        return Err(malformed());
    }

    let hash = InviteHash {
        user_id: Uuid::parse_str(parts[0]).map_err(|_| malformed())?,
        account_id: Uuid::parse_str(parts[1]).map_err(|_| malformed())?,
        created_at: parts[2].parse().map_err(|_| malformed())?,
        expires_at: parts[3].parse().map_err(|_| malformed())?,
        request_ip: parts[4].parse().map_err(|_| malformed())?,
    };

    if hash.expires_at < now.timestamp() {
        return Err(AuthError::InviteExpired {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(hash)
}

#[track_caller]
fn malformed() -> AuthError {
    AuthError::InviteMalformed {
        location: ErrorLocation::from(Location::caller()),
    }
}
