use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassNote.
#[derive(Debug, Error)]
pub enum PassNoteError {
    // --- Memory errors ---
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    // --- Tree errors ---
    #[error("Node '{0}' already exists")]
    NodeAlreadyExists(String),

    #[error("Field '{0}' already exists")]
    FieldAlreadyExists(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Field '{0}' not found")]
    FieldNotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    // --- Format errors ---
    #[error("Invalid database format: {0}")]
    InvalidFormat(String),

    #[error("HMAC verification failed — wrong password or tampered file")]
    HmacMismatch,

    #[error("Packed tree footer missing — data is truncated or tampered")]
    FooterMismatch,

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Random source unavailable: {0}")]
    RandomSourceFailed(String),

    // --- Storage errors ---
    #[error("Database not found at {0}")]
    DatabaseNotFound(PathBuf),

    #[error("Database already exists at {0}")]
    DatabaseAlreadyExists(PathBuf),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl PassNoteError {
    /// Returns `true` for failures that indicate tampering or a wrong
    /// password rather than a malformed file.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::HmacMismatch | Self::FooterMismatch)
    }

    /// Returns `true` for sibling-name collisions on insert or rename.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::NodeAlreadyExists(_) | Self::FieldAlreadyExists(_))
    }
}

/// Convenience type alias for PassNote results.
pub type Result<T> = std::result::Result<T, PassNoteError>;
