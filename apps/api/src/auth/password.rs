//! Password and session-token hashing.
//!
//! Passwords are stored as `HMAC-SHA256(pepper, salt || password)` with a
//! per-user random salt. Session tokens are handed out raw and only their
//! SHA-256 digest is persisted.

use anyhow::anyhow;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 32;

fn random_hex(len: usize) -> String {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

pub fn generate_salt() -> String {
    random_hex(SALT_BYTES)
}

pub fn generate_session_token() -> String {
    random_hex(TOKEN_BYTES)
}

fn password_mac(pepper: &str, salt: &str, password: &str) -> Result<HmacSha256, AppError> {
    let mut mac = HmacSha256::new_from_slice(pepper.as_bytes())
        .map_err(|e| AppError::Internal(anyhow!("invalid pepper: {e}")))?;
    mac.update(salt.as_bytes());
    mac.update(password.as_bytes());
    Ok(mac)
}

pub fn hash_password(pepper: &str, salt: &str, password: &str) -> Result<String, AppError> {
    let mac = password_mac(pepper, salt, password)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checked in place of a real account so unknown emails cost the same HMAC work.
const DUMMY_SALT: &str = "00000000000000000000000000000000";
const DUMMY_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Always `false`; runs the same work as `verify_password` on a real row.
pub fn verify_dummy_password(pepper: &str, password: &str) -> Result<bool, AppError> {
    verify_password(pepper, DUMMY_SALT, password, DUMMY_HASH)
}

/// Constant-time comparison against a stored hex digest.
pub fn verify_password(
    pepper: &str,
    salt: &str,
    password: &str,
    stored_hash: &str,
) -> Result<bool, AppError> {
    let Ok(expected) = hex::decode(stored_hash) else {
        return Ok(false);
    };
    let mac = password_mac(pepper, salt, password)?;
    Ok(mac.verify_slice(&expected).is_ok())
}

pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
