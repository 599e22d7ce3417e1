//! `passnote search` — find nodes and fields by name or value.

use crate::cli::output;
use crate::cli::{load_settings, open_database, Cli};
use crate::errors::Result;
use crate::search::{search, SearchOptions};

/// Which targets the user selected on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Targets {
    pub holders: bool,
    pub leaves: bool,
    pub names: bool,
    pub values: bool,
}

/// Execute the `search` command.
pub fn execute(
    cli: &Cli,
    phrase: &str,
    targets: Targets,
    ignore_whitespace: bool,
    reveal: bool,
) -> Result<()> {
    let settings = load_settings()?;
    let options = build_options(targets, ignore_whitespace || settings.ignore_whitespace);

    let db = open_database(cli)?;
    let results = search(db.root(), options, phrase);

    output::print_search_results(&results, reveal);
    if !results.is_empty() {
        output::info(&format!("{} matches", results.len()));
    }
    Ok(())
}

/// Turn command-line flags into search options. No target flag means
/// every target.
fn build_options(targets: Targets, ignore_whitespace: bool) -> SearchOptions {
    let mut options = SearchOptions::NONE;
    if targets.holders {
        options |= SearchOptions::HOLDER_NAME;
    }
    if targets.leaves {
        options |= SearchOptions::LEAF_NAME;
    }
    if targets.names {
        options |= SearchOptions::FIELD_NAME;
    }
    if targets.values {
        options |= SearchOptions::FIELD_VALUE;
    }
    if options.is_empty() {
        options = SearchOptions::ALL;
    }
    if ignore_whitespace {
        options |= SearchOptions::IGNORE_WHITESPACE;
    }
    options
}
