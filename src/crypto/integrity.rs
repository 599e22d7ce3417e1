//! HMAC-SHA256 integrity tag over the encrypted payload.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{PassNoteError, Result};

/// Size of the HMAC tag (SHA-256 = 32 bytes).
pub const HMAC_LEN: usize = 32;

/// Compute HMAC-SHA256 of `data` under `key`.
pub fn compute_hmac(key: &[u8], data: &[u8]) -> Result<[u8; HMAC_LEN]> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| PassNoteError::KeyDerivationFailed(format!("invalid HMAC key: {e}")))?;

    mac.update(data);

    let mut tag = [0u8; HMAC_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Verify that the HMAC matches using constant-time comparison.
///
/// Uses `hmac::Mac::verify_slice`, which compares in constant time.
pub fn verify_hmac(key: &[u8], data: &[u8], expected: &[u8]) -> Result<()> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| PassNoteError::KeyDerivationFailed(format!("invalid HMAC key: {e}")))?;

    mac.update(data);

    mac.verify_slice(expected)
        .map_err(|_| PassNoteError::HmacMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_own_tag() {
        let key = [7u8; 32];
        let tag = compute_hmac(&key, b"payload").unwrap();
        assert!(verify_hmac(&key, b"payload", &tag).is_ok());
    }

    #[test]
    fn verify_rejects_modified_data() {
        let key = [7u8; 32];
        let tag = compute_hmac(&key, b"payload").unwrap();
        let err = verify_hmac(&key, b"pay1oad", &tag).unwrap_err();
        assert!(matches!(err, PassNoteError::HmacMismatch));
    }

    #[test]
    fn verify_rejects_truncated_tag() {
        let key = [7u8; 32];
        let tag = compute_hmac(&key, b"payload").unwrap();
        assert!(verify_hmac(&key, b"payload", &tag[..16]).is_err());
    }
}
