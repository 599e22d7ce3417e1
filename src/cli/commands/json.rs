//! `passnote json-export` / `passnote json-import` — exchange trees as JSON.
//!
//! JSON output holds every value in clear text.

use std::fs;
use std::io::Write;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{node_path, open_database, Cli};
use crate::codec::json::{from_json, to_json};
use crate::errors::Result;
use crate::merge::merge;

/// Execute the `json-export` command.
pub fn execute_export(cli: &Cli, file: Option<&str>) -> Result<()> {
    let db = open_database(cli)?;
    let json = to_json(db.root())?;

    match file {
        Some(file) => {
            write_private(Path::new(file), json.as_bytes())?;
            output::success(&format!("Wrote {file}"));
            output::warning("The JSON file is not encrypted.");
        }
        None => println!("{}", json.as_str()),
    }

    Ok(())
}

/// Execute the `json-import` command.
pub fn execute_import(cli: &Cli, file: &str, at: Option<&str>) -> Result<()> {
    let contents = Zeroizing::new(fs::read_to_string(file)?);
    let source = from_json(&contents)?;

    let mut db = open_database(cli)?;
    let indices = node_path(&db, at.unwrap_or(""))?;
    let stats = merge(db.node_at_mut(&indices)?, source);
    if !stats.is_empty() {
        db.save()?;
    }

    output::print_stats(&stats);
    Ok(())
}

fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
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
    let mut file = fs::File::create(path)?;

    file.write_all(contents)?;
    Ok(())
}
