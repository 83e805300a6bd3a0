//! Cryptographic utilities for token generation and secret comparison.

use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;

/// Number of random bytes behind an email verification token.
pub const VERIFICATION_TOKEN_BYTES: usize = 32;

/// Fills `len` bytes from the OS CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Generates a random token of `len` bytes, hex encoded (`2 * len` characters).
pub fn random_token_hex(len: usize) -> String {
    hex::encode(random_bytes(len))
}

/// Generates a single-use email verification token.
pub fn generate_verification_token() -> String {
    random_token_hex(VERIFICATION_TOKEN_BYTES)
}

/// Compares two byte strings without short-circuiting on the first mismatch.
///
/// Length differences are still observable; callers compare secrets of a
/// fixed, public length.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
