//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The round count and key length are fixed by the on-disk format:
//! every database ever written used 50 000 rounds and a 32-byte key.

use hmac::Hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{PassNoteError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count used by the file format.
pub const DERIVE_ROUNDS: u32 = 50_000;

/// A 32-byte derived key that zeroes its memory when dropped.
///
/// The same key encrypts the payload and authenticates the ciphertext.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Access the raw key bytes (e.g. to pass to the cipher or HMAC).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive the file key from a password and salt.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
    derive_key_with_rounds(password, salt, DERIVE_ROUNDS)
}

/// Derive a key with an explicit round count.
///
/// Only the fixed `DERIVE_ROUNDS` produce files other builds can read;
/// other counts exist for tests and benchmarks.
pub fn derive_key_with_rounds(password: &[u8], salt: &[u8], rounds: u32) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(PassNoteError::KeyDerivationFailed(
            "password must not be empty".into(),
        ));
    }
    if rounds < 1 {
        return Err(PassNoteError::KeyDerivationFailed(
            "PBKDF2 rounds must be at least 1".into(),
        ));
    }

    let mut key = DerivedKey {
        bytes: [0u8; KEY_LEN],
    };
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, rounds, &mut key.bytes)
        .map_err(|e| PassNoteError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}
