//! High-level database handle used by CLI commands.
//!
//! `Database` owns everything an open session needs: the file path, the
//! password, the tree and a dirty flag. Nothing is process-global; two
//! handles can be open side by side.

use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use super::file::{self, StorageOptions};
use crate::crypto::secure::SecretString;
use crate::errors::{PassNoteError, Result};
use crate::merge;
use crate::tree::{Node, Stats};

/// An open database.
pub struct Database {
    /// Path of the database file on disk.
    path: PathBuf,

    /// Empty means the file is stored unencrypted.
    password: SecretString,

    /// The whole tree, root included.
    root: Node,

    options: StorageOptions,

    /// Set by every mutation, cleared by a successful save.
    modified: bool,
}

impl Database {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a new database at `path` holding an empty root holder, and
    /// write it to disk.
    ///
    /// Pass `None` for `options` to use the defaults.
    pub fn create(
        path: &Path,
        password: &str,
        root_name: &str,
        options: Option<&StorageOptions>,
    ) -> Result<Self> {
        if path.exists() {
            return Err(PassNoteError::DatabaseAlreadyExists(path.to_path_buf()));
        }

        let mut db = Self {
            path: path.to_path_buf(),
            password: Zeroizing::new(password.to_string()),
            root: Node::new_holder(root_name),
            options: options.copied().unwrap_or_default(),
            modified: true,
        };
        db.save()?;

        Ok(db)
    }

    /// Open and decode an existing database.
    pub fn open(path: &Path, password: &str, options: Option<&StorageOptions>) -> Result<Self> {
        let options = options.copied().unwrap_or_default();
        let root = file::load_with(path, password, &options)?;

        Ok(Self {
            path: path.to_path_buf(),
            password: Zeroizing::new(password.to_string()),
            root,
            options,
            modified: false,
        })
    }

    // ------------------------------------------------------------------
    // Tree access
    // ------------------------------------------------------------------

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mutable access to the tree. Marks the database as modified.
    pub fn root_mut(&mut self) -> &mut Node {
        self.modified = true;
        &mut self.root
    }

    /// Node at `path` (child indices from the root).
    pub fn node_at(&self, path: &[usize]) -> Result<&Node> {
        self.root
            .find_by_path(path)
            .ok_or_else(|| PassNoteError::NodeNotFound(format!("{path:?}")))
    }

    /// Mutable node at `path`. Marks the database as modified.
    pub fn node_at_mut(&mut self, path: &[usize]) -> Result<&mut Node> {
        self.modified = true;
        self.root
            .find_by_path_mut(path)
            .ok_or_else(|| PassNoteError::NodeNotFound(format!("{path:?}")))
    }

    // ------------------------------------------------------------------
    // Branch operations
    // ------------------------------------------------------------------

    /// Load another database and merge it into the node at `at`.
    pub fn merge_file(&mut self, path: &Path, password: &str, at: &[usize]) -> Result<Stats> {
        let source = file::load_with(path, password, &self.options)?;
        let target = self.node_at_mut(at)?;
        let stats = merge::merge(target, source);

        debug!(source = %path.display(), ?stats, "merged database file");
        Ok(stats)
    }

    /// Load another database and add its root as a child of the holder at
    /// `at`. Returns the new child's position.
    pub fn import_branch(&mut self, path: &Path, password: &str, at: &[usize]) -> Result<usize> {
        let branch = file::load_with(path, password, &self.options)?;
        let holder = self
            .node_at_mut(at)?
            .as_holder_mut()
            .ok_or_else(|| PassNoteError::InvalidOperation("cannot import into a leaf".into()))?;
        holder.append_child(branch)
    }

    /// Save the subtree at `at` as a database of its own.
    pub fn export_branch(&self, at: &[usize], path: &Path, password: &str) -> Result<()> {
        let branch = self.node_at(at)?;
        file::save_with(path, branch, password, &self.options)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the tree to this database's path.
    pub fn save(&mut self) -> Result<()> {
        file::save_with(&self.path, &self.root, &self.password, &self.options)?;
        self.modified = false;
        Ok(())
    }

    /// Write the tree to a new path and keep using that path.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.path = path.to_path_buf();
        self.save()
    }

    /// Change the password used by the next save. An empty password
    /// switches to plaintext storage.
    pub fn set_password(&mut self, password: &str) {
        self.password = Zeroizing::new(password.to_string());
        self.modified = true;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_encrypted(&self) -> bool {
        !self.password.is_empty()
    }

    /// `true` if the tree changed since it was last loaded or saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}
