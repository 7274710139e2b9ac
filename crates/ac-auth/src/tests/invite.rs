use crate::{AuthError, new_invite_hash, parse_invite_hash};

use std::net::IpAddr;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const SECRET: &str = "invite-pre-shared-secret";

fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn request_ip() -> IpAddr {
    "69.56.104.36".parse().unwrap()
}

// Encrypts an arbitrary plaintext with the codec's scheme, to reach the
// field validation paths with payloads the public constructor cannot emit.
fn encrypt_raw(secret: &str, plaintext: &str) -> String {
    let key = Sha256::digest(secret.as_bytes());
    let cipher = Aes256Gcm::new_from_slice(&key).unwrap();
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher.encrypt(&nonce, plaintext.as_bytes()).unwrap();

    let mut raw = Vec::with_capacity(nonce.len() + ciphertext.len());
    raw.extend_from_slice(&nonce);
    raw.extend_from_slice(&ciphertext);
    URL_SAFE_NO_PAD.encode(raw)
}

#[test]
fn given_valid_invite_when_parsed_then_fields_round_trip() {
    let now = fixed_now();
    let user_id = Uuid::new_v4();
    let account_id = Uuid::new_v4();
    let ttl = TimeDelta::hours(24);

    let hash = new_invite_hash(SECRET, user_id, account_id, request_ip(), ttl, now).unwrap();
    let parsed = parse_invite_hash(SECRET, &hash, now).unwrap();

    assert_eq!(parsed.user_id, user_id);
    assert_eq!(parsed.account_id, account_id);
    assert_eq!(parsed.request_ip, request_ip());
    assert_eq!(parsed.created_at, now.timestamp());
    assert_eq!(parsed.expires_at, (now + ttl).timestamp());
}

#[test]
fn given_identical_fields_then_ciphertexts_differ() {
    let now = fixed_now();
    let user_id = Uuid::new_v4();
    let account_id = Uuid::new_v4();
    let ttl = TimeDelta::hours(24);

    let first = new_invite_hash(SECRET, user_id, account_id, request_ip(), ttl, now).unwrap();
    let second = new_invite_hash(SECRET, user_id, account_id, request_ip(), ttl, now).unwrap();

    assert_ne!(first, second);
    // Both still decrypt to the same record.
    assert_eq!(
        parse_invite_hash(SECRET, &first, now).unwrap(),
        parse_invite_hash(SECRET, &second, now).unwrap()
    );
}

#[test]
fn given_any_single_flipped_byte_then_parse_fails() {
    let now = fixed_now();
    let hash = new_invite_hash(
        SECRET,
        Uuid::new_v4(),
        Uuid::new_v4(),
        request_ip(),
        TimeDelta::hours(24),
        now,
    )
    .unwrap();
    let raw = URL_SAFE_NO_PAD.decode(&hash).unwrap();

    for i in 0..raw.len() {
        let mut tampered = raw.clone();
        tampered[i] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(tampered);

        let result = parse_invite_hash(SECRET, &tampered, now);
        assert!(
            matches!(result, Err(AuthError::InviteMalformed { .. })),
            "byte {} survived tampering",
            i
        );
    }
}

#[test]
fn given_wrong_secret_when_parsed_then_invite_malformed() {
    let now = fixed_now();
    let hash = new_invite_hash(
        SECRET,
        Uuid::new_v4(),
        Uuid::new_v4(),
        request_ip(),
        TimeDelta::hours(24),
        now,
    )
    .unwrap();

    let result = parse_invite_hash("a-different-secret", &hash, now);

    assert!(matches!(result, Err(AuthError::InviteMalformed { .. })));
}

#[test]
fn given_one_hour_ttl_then_expiry_boundary_is_enforced() {
    let now = fixed_now();
    let hash = new_invite_hash(
        SECRET,
        Uuid::new_v4(),
        Uuid::new_v4(),
        request_ip(),
        TimeDelta::hours(1),
        now,
    )
    .unwrap();

    assert!(parse_invite_hash(SECRET, &hash, now + TimeDelta::minutes(59)).is_ok());

    let late = parse_invite_hash(
        SECRET,
        &hash,
        now + TimeDelta::hours(1) + TimeDelta::seconds(1),
    );
    assert!(matches!(late, Err(AuthError::InviteExpired { .. })));
}

#[test]
fn given_wrong_field_count_when_parsed_then_invite_malformed() {
    let now = fixed_now();
    let four_fields = format!(
        "{}|{}|{}|{}",
        Uuid::new_v4(),
        Uuid::new_v4(),
        now.timestamp(),
        request_ip()
    );
    let six_fields = format!(
        "{}|{}|{}|{}|{}|extra",
        Uuid::new_v4(),
        Uuid::new_v4(),
        now.timestamp(),
        (now + TimeDelta::hours(1)).timestamp(),
        request_ip()
    );

    for plaintext in [four_fields, six_fields] {
        let hash = encrypt_raw(SECRET, &plaintext);
        let result = parse_invite_hash(SECRET, &hash, now);
        assert!(matches!(result, Err(AuthError::InviteMalformed { .. })));
    }
}

#[test]
fn given_malformed_fields_when_parsed_then_invite_malformed() {
    let now = fixed_now();
    let expires = (now + TimeDelta::hours(1)).timestamp();

    // Bad UUID, bad timestamp, bad IP.
    let payloads = [
        format!("not-a-uuid|{}|{}|{}|{}", Uuid::new_v4(), now.timestamp(), expires, request_ip()),
        format!(
            "{}|{}|soon|{}|{}",
            Uuid::new_v4(),
            Uuid::new_v4(),
            expires,
            request_ip()
        ),
        format!(
            "{}|{}|{}|{}|localhost",
            Uuid::new_v4(),
            Uuid::new_v4(),
            now.timestamp(),
            expires
        ),
    ];

    for plaintext in payloads {
        let hash = encrypt_raw(SECRET, &plaintext);
        let result = parse_invite_hash(SECRET, &hash, now);
        assert!(matches!(result, Err(AuthError::InviteMalformed { .. })));
    }
}

#[test]
fn given_expired_invite_then_error_kind_is_distinct_from_malformed() {
    let now = fixed_now();
    let hash = new_invite_hash(
        SECRET,
        Uuid::new_v4(),
        Uuid::new_v4(),
        request_ip(),
        TimeDelta::hours(1),
        now,
    )
    .unwrap();

    let err = parse_invite_hash(SECRET, &hash, now + TimeDelta::hours(2)).unwrap_err();

    assert_eq!(err.error_code(), "INVITE_EXPIRED");
    assert!(!matches!(err, AuthError::InviteMalformed { .. }));
}
