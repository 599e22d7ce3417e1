//! Encrypted single-file storage.
//!
//! An encrypted database file has this layout:
//!
//! ```text
//! [salt: 32 bytes][HMAC-SHA256: 32 bytes][IV: 16 bytes][ciphertext: N x 16 bytes]
//! ```
//!
//! - **Salt**: random, except that the high nibble of the first byte holds
//!   the compressed length modulo 16 (0 when it is block-aligned).
//! - **Key**: PBKDF2-HMAC-SHA256, 50 000 rounds, over the stored salt.
//!   The same key drives AES-256-CBC and the HMAC.
//! - **Ciphertext**: the LZ4-compressed packed tree, zero-padded to a
//!   multiple of 16 and encrypted with AES-256-CBC.
//! - **HMAC**: computed over the ciphertext; checked before decrypting.
//!
//! With an empty password the file is the packed tree itself.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::compression;
use crate::codec;
use crate::crypto::cipher::{self, BLOCK_LEN, IV_LEN};
use crate::crypto::integrity::{compute_hmac, verify_hmac, HMAC_LEN};
use crate::crypto::kdf::{derive_key, SALT_LEN};
use crate::crypto::secure::{random_array, SecretBytes};
use crate::errors::{PassNoteError, Result};
use crate::tree::Node;

/// Bytes in front of the ciphertext: salt, HMAC and IV.
pub const HEADER_LEN: usize = SALT_LEN + HMAC_LEN + IV_LEN;

/// Default ceiling on decompressed size (64 MiB).
pub const DEFAULT_MAX_PLAINTEXT_BYTES: usize = 64 * 1024 * 1024;

/// Knobs for loading and saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageOptions {
    /// Largest decompressed tree accepted on load.
    pub max_plaintext_bytes: usize,

    /// Rename the previous file to `<path>.bak` before saving.
    pub backup_on_save: bool,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            max_plaintext_bytes: DEFAULT_MAX_PLAINTEXT_BYTES,
            backup_on_save: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load a database with default options.
pub fn load(path: &Path, password: &str) -> Result<Node> {
    load_with(path, password, &StorageOptions::default())
}

/// Load a database. An empty password reads a plaintext packed tree.
pub fn load_with(path: &Path, password: &str, options: &StorageOptions) -> Result<Node> {
    let data = read_file(path)?;
    debug!(path = %path.display(), bytes = data.len(), encrypted = !password.is_empty(), "loading database");

    if password.is_empty() {
        return codec::unpack(&data);
    }

    let packed = decrypt_packed(&data, password, options)?;
    codec::unpack(&packed)
}

/// Verify, decrypt and decompress the contents of an encrypted file.
///
/// The HMAC is checked before anything is decrypted; a mismatch means a
/// wrong password or a modified file.
pub fn decrypt_packed(data: &[u8], password: &str, options: &StorageOptions) -> Result<SecretBytes> {
    if data.len() < HEADER_LEN + BLOCK_LEN || (data.len() - HEADER_LEN) % BLOCK_LEN != 0 {
        return Err(PassNoteError::InvalidFormat(format!(
            "encrypted file length {} is not {HEADER_LEN} plus a positive multiple of {BLOCK_LEN}",
            data.len()
        )));
    }

    let (salt, rest) = data.split_at(SALT_LEN);
    let (stored_hmac, rest) = rest.split_at(HMAC_LEN);
    let (iv, ciphertext) = rest.split_at(IV_LEN);

    let key = derive_key(password.as_bytes(), salt)?;
    verify_hmac(key.as_bytes(), ciphertext, stored_hmac)?;

    let padded = cipher::decrypt(key.as_bytes(), iv, ciphertext)?;
    drop(key);

    let remainder = usize::from(salt[0] >> 4);
    let compressed_len = if remainder == 0 {
        ciphertext.len()
    } else {
        ciphertext.len() - BLOCK_LEN + remainder
    };
    debug!(ciphertext = ciphertext.len(), compressed = compressed_len, "decrypted database");

    compression::decompress(
        &padded[..compressed_len],
        ciphertext.len(),
        options.max_plaintext_bytes,
    )
}

fn read_file(path: &Path) -> Result<SecretBytes> {
    match fs::read(path) {
        Ok(bytes) => Ok(Zeroizing::new(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PassNoteError::DatabaseNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Save a database with default options.
pub fn save(path: &Path, root: &Node, password: &str) -> Result<()> {
    save_with(path, root, password, &StorageOptions::default())
}

/// Save a database, replacing any file at `path`.
///
/// An empty password writes the packed tree unencrypted.
pub fn save_with(path: &Path, root: &Node, password: &str, options: &StorageOptions) -> Result<()> {
    let packed = codec::pack(root)?;
    let contents = if password.is_empty() {
        packed
    } else {
        Zeroizing::new(encrypt_packed(&packed, password)?)
    };

    if options.backup_on_save {
        backup_existing(path);
    }
    write_file(path, &contents)?;

    debug!(path = %path.display(), bytes = contents.len(), "saved database");
    Ok(())
}

/// Compress, pad, encrypt and authenticate a packed tree.
pub fn encrypt_packed(packed: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut salt: [u8; SALT_LEN] = random_array()?;
    let iv: [u8; IV_LEN] = random_array()?;

    let mut compressed = compression::compress(packed)?;
    let remainder = compressed.len() % BLOCK_LEN;
    // remainder < 16, so the shift fits in a byte.
    salt[0] = ((remainder as u8) << 4) | (salt[0] & 0x0f);

    let key = derive_key(password.as_bytes(), &salt)?;

    let padded_len = compressed.len() + (BLOCK_LEN - remainder) % BLOCK_LEN;
    compressed.resize(padded_len, 0);

    let ciphertext = cipher::encrypt(key.as_bytes(), &iv, &compressed)?;
    let hmac = compute_hmac(key.as_bytes(), &ciphertext)?;

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&hmac);
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// `<path>.bak` next to the database.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

fn backup_existing(path: &Path) {
    if !path.exists() {
        return;
    }
    let backup = backup_path(path);
    if let Err(e) = fs::rename(path, &backup) {
        warn!(path = %path.display(), error = %e, "could not keep backup of previous database");
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
    };

    #[cfg(not(unix))]
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Field, Holder, Leaf};

    fn sample() -> Node {
        let mut root = Holder::new("Root");
        let mut leaf = Leaf::new("Mail");
        leaf.append_field(Field::with_modified("user", "bob", 42)).unwrap();
        root.append_child(leaf.into()).unwrap();
        root.into()
    }

    #[test]
    fn encrypted_layout_and_roundtrip() {
        let packed = codec::pack(&sample()).unwrap();
        let data = encrypt_packed(&packed, "hunter2").unwrap();
        assert!(data.len() > HEADER_LEN);
        assert_eq!((data.len() - HEADER_LEN) % BLOCK_LEN, 0);

        let plain = decrypt_packed(&data, "hunter2", &StorageOptions::default()).unwrap();
        assert_eq!(&plain[..], &packed[..]);
    }

    #[test]
    fn wrong_password_fails_hmac() {
        let packed = codec::pack(&sample()).unwrap();
        let data = encrypt_packed(&packed, "right").unwrap();
        let err = decrypt_packed(&data, "wrong", &StorageOptions::default()).unwrap_err();
        assert!(matches!(err, PassNoteError::HmacMismatch));
    }

    #[test]
    fn flipped_ciphertext_bit_fails_hmac() {
        let packed = codec::pack(&sample()).unwrap();
        let mut data = encrypt_packed(&packed, "pw").unwrap();
        let last = data.len() - 1;
        data[last] ^= 1;
        let err = decrypt_packed(&data, "pw", &StorageOptions::default()).unwrap_err();
        assert!(err.is_integrity_failure());
    }

    #[test]
    fn bad_lengths_are_invalid_format() {
        let opts = StorageOptions::default();
        assert!(matches!(
            decrypt_packed(&[0u8; HEADER_LEN], "pw", &opts),
            Err(PassNoteError::InvalidFormat(_))
        ));
        assert!(matches!(
            decrypt_packed(&[0u8; HEADER_LEN + 17], "pw", &opts),
            Err(PassNoteError::InvalidFormat(_))
        ));
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/tmp/db.pn")),
            PathBuf::from("/tmp/db.pn.bak")
        );
    }
}
