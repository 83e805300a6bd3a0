//! Password hashing utilities using PBKDF2-HMAC-SHA256.
//!
//! Stored hashes are self-describing strings of the form
//! `pbkdf2:<salt hex>:<derived key hex>`, with a 16-byte random salt,
//! 100,000 iterations and a 256-bit derived key.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::crypto::random_bytes;

/// Error type for password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Unsupported password hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Algorithm tag at the front of every stored hash.
pub const ALGORITHM_TAG: &str = "pbkdf2";

pub const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Hash spent on logins for unknown emails so both paths cost one derivation.
const DUMMY_HASH: &str = "pbkdf2:00000000000000000000000000000000:\
0000000000000000000000000000000000000000000000000000000000000000";

fn derive(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ITERATIONS, &mut key);
    key
}

/// Hashes a password with a fresh random salt.
///
/// # Example
/// ```
/// use shared::password::hash_password;
///
/// let hash = hash_password("Abc12345!");
/// assert!(hash.starts_with("pbkdf2:"));
/// ```
pub fn hash_password(password: &str) -> String {
    let salt = random_bytes(SALT_LEN);
    let key = derive(password, &salt);
    format!("{}:{}:{}", ALGORITHM_TAG, hex::encode(&salt), hex::encode(key))
}

/// Verifies a password against a stored hash.
///
/// # Returns
/// * `Ok(true)` - Password matches
/// * `Ok(false)` - Password does not match
/// * `Err(PasswordError)` - The stored hash is not a PBKDF2 hash this module produced
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parts: Vec<&str> = stored.split(':').collect();
    let [tag, salt_hex, key_hex] = parts.as_slice() else {
        return Err(PasswordError::InvalidHashFormat);
    };

    if *tag != ALGORITHM_TAG {
        return Err(PasswordError::UnsupportedAlgorithm((*tag).to_string()));
    }

    let salt = hex::decode(salt_hex).map_err(|_| PasswordError::InvalidHashFormat)?;
    let expected = hex::decode(key_hex).map_err(|_| PasswordError::InvalidHashFormat)?;
    if expected.len() != KEY_LEN {
        return Err(PasswordError::InvalidHashFormat);
    }

    let derived = derive(password, &salt);
    Ok(derived.as_slice().ct_eq(expected.as_slice()).into())
}

/// Burns one key derivation without a real account behind it.
pub fn verify_against_dummy(password: &str) {
    let _ = verify_password(password, DUMMY_HASH);
}
