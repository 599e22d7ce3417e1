//! Storage module — the database file on disk.
//!
//! This module provides:
//! - LZ4 block compression with a bounded decompressor (`compression`)
//! - The encrypted and plaintext file pipeline (`file`)
//! - The `Database` handle for an open session (`database`)

pub mod compression;
pub mod database;
pub mod file;

// Re-export the most commonly used items.
pub use database::Database;
pub use file::{load, load_with, save, save_with, StorageOptions};
