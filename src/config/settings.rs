use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PassNoteError, Result};
use crate::storage::StorageOptions;

/// Directory-level configuration, loaded from `.passnote.toml`.
///
/// Every field has a default, so PassNote works without any config
/// file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Database file used when `--file` is not given.
    #[serde(default = "default_file")]
    pub default_file: String,

    /// Largest decompressed tree accepted on load (default: 64 MiB).
    #[serde(default = "default_max_plaintext_bytes")]
    pub max_plaintext_bytes: u64,

    /// Keep the previous file as `<file>.bak` on every save.
    #[serde(default = "default_backup_on_save")]
    pub backup_on_save: bool,

    /// Default for `search --ignore-whitespace`.
    #[serde(default)]
    pub ignore_whitespace: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_file() -> String {
    "passnote.db".to_string()
}

fn default_max_plaintext_bytes() -> u64 {
    64 * 1024 * 1024
}

fn default_backup_on_save() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_file: default_file(),
            max_plaintext_bytes: default_max_plaintext_bytes(),
            backup_on_save: default_backup_on_save(),
            ignore_whitespace: false,
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    const FILE_NAME: &'static str = ".passnote.toml";

    /// Load settings from `<dir>/.passnote.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassNoteError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.max_plaintext_bytes == 0 {
            return Err(PassNoteError::ConfigError(
                "max_plaintext_bytes must be greater than zero".into(),
            ));
        }

        Ok(settings)
    }

    /// Path of the default database file.
    ///
    /// Example: `dir/passnote.db`
    pub fn database_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.default_file)
    }

    /// Convert into storage-layer options.
    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            max_plaintext_bytes: usize::try_from(self.max_plaintext_bytes).unwrap_or(usize::MAX),
            backup_on_save: self.backup_on_save,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
