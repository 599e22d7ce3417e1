//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::SecretString;
use crate::errors::{PassNoteError, Result};
use crate::storage::Database;
use crate::tree::{resolve_names, split_path};

/// Minimum length for a new master password.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable that supplies the password non-interactively.
pub const PASSWORD_ENV: &str = "PASSNOTE_PASSWORD";

/// PassNote CLI: hierarchical password manager.
#[derive(Parser)]
#[command(
    name = "passnote",
    about = "Hierarchical password manager with an encrypted single-file store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (default: passnote.db, or `default_file` in .passnote.toml)
    #[arg(short, long, env = "PASSNOTE_FILE", global = true)]
    pub file: Option<String>,

    /// Store and read the database unencrypted
    #[arg(long, global = true)]
    pub plain: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty database
    Init {
        /// Name of the root holder
        #[arg(long, default_value = "Root")]
        root: String,
    },

    /// Show the tree, or the fields of one leaf
    Show {
        /// Node path below the root (e.g. Bank/Savings)
        path: Option<String>,
        /// Print field values instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Add a holder (folder) under a holder
    AddHolder {
        /// Parent holder path ("/" for the root)
        path: String,
        /// Name of the new holder
        name: String,
    },

    /// Add a leaf (entry) under a holder
    AddLeaf {
        /// Parent holder path ("/" for the root)
        path: String,
        /// Name of the new leaf
        name: String,
    },

    /// Set a field on a leaf (add or update)
    Set {
        /// Leaf path
        path: String,
        /// Field name; one-letter shortcuts expand (u Username, p Password, ...)
        field: String,
        /// Field value (omit for interactive prompt)
        value: Option<String>,
        /// Fill the value with a generated password
        #[arg(short, long, conflicts_with = "value")]
        generate: bool,
    },

    /// Rename a node, or a field with --field
    Rename {
        /// Node path ("/" renames the root)
        path: String,
        /// New name
        new_name: String,
        /// Rename this field of the leaf instead of the node
        #[arg(long)]
        field: Option<String>,
    },

    /// Delete a node, or a field with --field
    Delete {
        /// Node path
        path: String,
        /// Delete this field of the leaf instead of the node
        #[arg(long)]
        field: Option<String>,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Search names and values (all targets when none is selected)
    Search {
        /// Text to look for (case-insensitive)
        phrase: String,
        /// Match holder names
        #[arg(long)]
        holders: bool,
        /// Match leaf names
        #[arg(long)]
        leaves: bool,
        /// Match field names
        #[arg(long)]
        names: bool,
        /// Match field values
        #[arg(long)]
        values: bool,
        /// Ignore spaces and tabs while comparing
        #[arg(short = 'w', long)]
        ignore_whitespace: bool,
        /// Print matched values instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Merge another database file into this one
    Merge {
        /// Database file to merge from
        file: String,
        /// Node to merge into (default: the root)
        #[arg(long)]
        at: Option<String>,
        /// The source file is unencrypted
        #[arg(long)]
        source_plain: bool,
    },

    /// Add another database file as a new branch
    Import {
        /// Database file to import
        file: String,
        /// Holder to import under (default: the root)
        #[arg(long)]
        at: Option<String>,
        /// The source file is unencrypted
        #[arg(long)]
        source_plain: bool,
    },

    /// Save one branch as a database file of its own
    Export {
        /// Node path of the branch
        path: String,
        /// Output database file
        file: String,
    },

    /// Write the tree as JSON (stdout if no file is given)
    JsonExport {
        /// Output file path
        file: Option<String>,
    },

    /// Merge a JSON tree into the database
    JsonImport {
        /// JSON file to read
        file: String,
        /// Node to merge into (default: the root)
        #[arg(long)]
        at: Option<String>,
    },

    /// Print a leaf's fields as tab-separated lines
    CopyTsv {
        /// Leaf path
        path: String,
    },

    /// Update a leaf from tab-separated lines
    PasteTsv {
        /// Leaf path
        path: String,
        /// File with `name<TAB>value` lines ("-" for stdin)
        file: String,
    },

    /// Re-sort every holder and leaf
    Sort,

    /// Change the master password
    Passwd,

    /// Generate a random password
    Generate {
        /// Upper bound on the length (at least 10)
        #[arg(long, default_value = "20")]
        max_len: usize,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the database password, trying in order:
/// 1. `--plain` (empty password, unencrypted file)
/// 2. `PASSNOTE_PASSWORD` env var
/// 3. Interactive prompt
pub fn prompt_password(cli: &Cli) -> Result<SecretString> {
    if cli.plain {
        return Ok(Zeroizing::new(String::new()));
    }
    prompt_password_with("Enter database password")
}

/// Get a password for some database file, checking `PASSNOTE_PASSWORD`
/// before prompting with `prompt`.
pub fn prompt_password_with(prompt: &str) -> Result<SecretString> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| PassNoteError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used by `init` and `passwd`).
///
/// Respects `--plain` and `PASSNOTE_PASSWORD` for scripted usage.
pub fn prompt_new_password(cli: &Cli) -> Result<SecretString> {
    if cli.plain {
        return Ok(Zeroizing::new(String::new()));
    }

    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(PassNoteError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose database password")
            .with_confirmation(
                "Confirm database password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| PassNoteError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Resolve the database file from `--file` or the settings in the
/// current directory.
pub fn database_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.file {
        Some(file) => Ok(cwd.join(file)),
        None => Ok(Settings::load(&cwd)?.database_path(&cwd)),
    }
}

/// Load settings from the current directory.
pub fn load_settings() -> Result<Settings> {
    Settings::load(&std::env::current_dir()?)
}

/// Open the database named by the CLI arguments.
pub fn open_database(cli: &Cli) -> Result<Database> {
    let path = database_path(cli)?;
    let settings = load_settings()?;
    let password = prompt_password(cli)?;
    Database::open(&path, &password, Some(&settings.storage_options()))
}

/// Resolve a `/`-separated name path to child indices from the root.
pub fn node_path(db: &Database, path: &str) -> Result<Vec<usize>> {
    resolve_names(db.root(), &split_path(path))
}

/// Split a name path into the parent's indices and the last name.
///
/// Fails for an empty path, which has no parent.
pub fn parent_path(db: &Database, path: &str) -> Result<(Vec<usize>, String)> {
    let names = split_path(path);
    let (last, parents) = names
        .split_last()
        .ok_or_else(|| PassNoteError::InvalidOperation("the root has no parent".into()))?;
    let indices = resolve_names(db.root(), parents)?;
    Ok((indices, (*last).to_string()))
}
