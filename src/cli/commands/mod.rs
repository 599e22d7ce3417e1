//! One module per subcommand.

pub mod add;
pub mod delete;
pub mod export;
pub mod generate;
pub mod import_cmd;
pub mod init;
pub mod json;
pub mod merge;
pub mod passwd;
pub mod rename;
pub mod search;
pub mod set;
pub mod show;
pub mod sort;
pub mod tsv;
