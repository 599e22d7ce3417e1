//! AES-256-CBC block encryption.
//!
//! The file format pads the compressed payload itself (zero bytes up to a
//! multiple of 16) and records the real length in the salt, so the cipher
//! runs with no padding scheme of its own. Integrity comes from the
//! separate HMAC over the ciphertext, never from the cipher.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

use crate::crypto::secure::SecretBytes;
use crate::errors::{PassNoteError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Length of the CBC initialisation vector in bytes.
pub const IV_LEN: usize = 16;

/// Encrypt a block-aligned `plaintext` with a 32-byte `key` and 16-byte `iv`.
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.len() % BLOCK_LEN != 0 {
        return Err(PassNoteError::EncryptionFailed(format!(
            "plaintext length {} is not a multiple of {BLOCK_LEN}",
            plaintext.len()
        )));
    }

    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| PassNoteError::EncryptionFailed(format!("invalid key or IV length: {e}")))?;

    let mut buf = plaintext.to_vec();
    let len = buf.len();
    cipher
        .encrypt_padded_mut::<NoPadding>(&mut buf, len)
        .map_err(|_| PassNoteError::EncryptionFailed("block encryption error".into()))?;

    Ok(buf)
}

/// Decrypt a block-aligned `ciphertext` produced by `encrypt`.
///
/// The plaintext comes back in a zero-on-drop buffer.
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<SecretBytes> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(PassNoteError::DecryptionFailed(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            ciphertext.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| PassNoteError::DecryptionFailed(format!("invalid key or IV length: {e}")))?;

    let mut buf = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_padded_mut::<NoPadding>(&mut buf[..])
        .map_err(|_| PassNoteError::DecryptionFailed("block decryption error".into()))?;

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_blocks() {
        let key = [0x11u8; 32];
        let iv = [0x22u8; IV_LEN];
        let plaintext = [0xA5u8; 48];

        let ciphertext = encrypt(&key, &iv, &plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len());
        assert_ne!(&ciphertext[..], &plaintext[..]);

        let recovered = decrypt(&key, &iv, &ciphertext).unwrap();
        assert_eq!(&recovered[..], &plaintext[..]);
    }

    #[test]
    fn unaligned_input_is_rejected() {
        let key = [0u8; 32];
        let iv = [0u8; IV_LEN];
        assert!(encrypt(&key, &iv, &[0u8; 15]).is_err());
        assert!(decrypt(&key, &iv, &[0u8; 17]).is_err());
        assert!(decrypt(&key, &iv, &[]).is_err());
    }

    #[test]
    fn short_key_is_rejected() {
        assert!(encrypt(&[0u8; 16], &[0u8; IV_LEN], &[0u8; 16]).is_err());
    }

    #[test]
    fn matches_nist_sp800_38a_vector() {
        // F.2.5 CBC-AES256.Encrypt, first block.
        let key = [
            0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d,
            0x77, 0x81, 0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3,
            0x09, 0x14, 0xdf, 0xf4,
        ];
        let iv: Vec<u8> = (0u8..16).collect();
        let plaintext = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93,
            0x17, 0x2a,
        ];
        let expected = [
            0xf5, 0x8c, 0x4c, 0x04, 0xd6, 0xe5, 0xf1, 0xba, 0x77, 0x9e, 0xab, 0xfb, 0x5f, 0x7b,
            0xfb, 0xd6,
        ];

        let ciphertext = encrypt(&key, &iv, &plaintext).unwrap();
        assert_eq!(ciphertext, expected);
    }
}
