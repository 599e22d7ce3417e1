//! Cryptographic primitives for PassNote.
//!
//! This module provides:
//! - Zero-on-drop buffers and OS randomness (`secure`)
//! - PBKDF2-HMAC-SHA256 key derivation (`kdf`)
//! - AES-256-CBC encryption and decryption (`cipher`)
//! - HMAC-SHA256 integrity tags (`integrity`)
//! - The random password generator (`password`)

pub mod cipher;
pub mod integrity;
pub mod kdf;
pub mod password;
pub mod secure;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, encrypt, decrypt, ...};
pub use cipher::{decrypt, encrypt};
pub use integrity::{compute_hmac, verify_hmac};
pub use kdf::{derive_key, DerivedKey};
pub use password::generate_password;
pub use secure::{random_array, random_bytes, SecretBytes, SecretString, SecureBuf, SecureVec};
