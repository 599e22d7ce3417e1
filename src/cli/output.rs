//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::DateTime;
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::search::SearchResult;
use crate::tree::{Leaf, Named, Node, Stats};

/// Shown in place of a field value unless `--reveal` is passed.
const MASK: &str = "********";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a subtree as an indented outline.
pub fn print_tree(node: &Node) {
    println!("{}", style(node.name()).bold());
    if let Node::Holder(holder) = node {
        let count = holder.len();
        for (i, child) in holder.children().iter().enumerate() {
            print_branch(child, "", i + 1 == count);
        }
    }
}

fn print_branch(node: &Node, prefix: &str, last: bool) {
    let connector = if last { "\u{2514}\u{2500}\u{2500} " } else { "\u{251c}\u{2500}\u{2500} " };

    match node {
        Node::Holder(holder) => {
            println!("{prefix}{connector}{}/", style(holder.name()).cyan().bold());
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "\u{2502}   " });
            let count = holder.len();
            for (i, child) in holder.children().iter().enumerate() {
                print_branch(child, &child_prefix, i + 1 == count);
            }
        }
        Node::Leaf(leaf) => {
            println!(
                "{prefix}{connector}{} {}",
                leaf.name(),
                style(format!("({} fields)", leaf.len())).dim()
            );
        }
    }
}

/// Print a table of a leaf's fields (Name, Value, Modified).
pub fn print_fields_table(leaf: &Leaf, reveal: bool) {
    if leaf.is_empty() {
        info(&format!("'{}' has no fields yet.", leaf.name()));
        tip("Run `passnote set <PATH> <FIELD>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Value", "Modified"]);

    for field in leaf.fields() {
        table.add_row(vec![
            field.name().to_string(),
            masked(field.value(), reveal),
            format_timestamp(field.modified()),
        ]);
    }

    println!("{table}");
}

/// Print search hits, one row per result.
pub fn print_search_results(results: &[SearchResult], reveal: bool) {
    if results.is_empty() {
        info("No matches.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Match", "Value"]);

    for result in results {
        let value = result.value().map(|v| masked(v, reveal)).unwrap_or_default();
        table.add_row(vec![result.breadcrumb().to_string(), value]);
    }

    println!("{table}");
}

/// One-line summary of merge or paste counters.
pub fn print_stats(stats: &Stats) {
    if stats.is_empty() {
        info("Nothing changed.");
        return;
    }
    success(&format!(
        "{} holders, {} leaves, {} fields added; {} fields updated",
        stats.holders_added, stats.leaves_added, stats.fields_added, stats.fields_updated
    ));
}

fn masked(value: &str, reveal: bool) -> String {
    if reveal {
        value.to_string()
    } else {
        MASK.to_string()
    }
}

/// Render Unix seconds as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}
