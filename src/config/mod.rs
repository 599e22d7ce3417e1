//! Configuration module — project-level settings from `.passnote.toml`.

pub mod settings;

pub use settings::Settings;
