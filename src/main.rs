use clap::{CommandFactory, Parser};
use passnote::cli::commands::search::Targets;
use passnote::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { ref root } => passnote::cli::commands::init::execute(&cli, root),
        Commands::Show { ref path, reveal } => {
            passnote::cli::commands::show::execute(&cli, path.as_deref(), reveal)
        }
        Commands::AddHolder { ref path, ref name } => {
            passnote::cli::commands::add::execute_holder(&cli, path, name)
        }
        Commands::AddLeaf { ref path, ref name } => {
            passnote::cli::commands::add::execute_leaf(&cli, path, name)
        }
        Commands::Set {
            ref path,
            ref field,
            ref value,
            generate,
        } => passnote::cli::commands::set::execute(&cli, path, field, value.as_deref(), generate),
        Commands::Rename {
            ref path,
            ref new_name,
            ref field,
        } => passnote::cli::commands::rename::execute(&cli, path, new_name, field.as_deref()),
        Commands::Delete {
            ref path,
            ref field,
            force,
        } => passnote::cli::commands::delete::execute(&cli, path, field.as_deref(), force),
        Commands::Search {
            ref phrase,
            holders,
            leaves,
            names,
            values,
            ignore_whitespace,
            reveal,
        } => {
            let targets = Targets {
                holders,
                leaves,
                names,
                values,
            };
            passnote::cli::commands::search::execute(&cli, phrase, targets, ignore_whitespace, reveal)
        }
        Commands::Merge {
            ref file,
            ref at,
            source_plain,
        } => passnote::cli::commands::merge::execute(&cli, file, at.as_deref(), source_plain),
        Commands::Import {
            ref file,
            ref at,
            source_plain,
        } => passnote::cli::commands::import_cmd::execute(&cli, file, at.as_deref(), source_plain),
        Commands::Export { ref path, ref file } => {
            passnote::cli::commands::export::execute(&cli, path, file)
        }
        Commands::JsonExport { ref file } => {
            passnote::cli::commands::json::execute_export(&cli, file.as_deref())
        }
        Commands::JsonImport { ref file, ref at } => {
            passnote::cli::commands::json::execute_import(&cli, file, at.as_deref())
        }
        Commands::CopyTsv { ref path } => passnote::cli::commands::tsv::execute_copy(&cli, path),
        Commands::PasteTsv { ref path, ref file } => {
            passnote::cli::commands::tsv::execute_paste(&cli, path, file)
        }
        Commands::Sort => passnote::cli::commands::sort::execute(&cli),
        Commands::Passwd => passnote::cli::commands::passwd::execute(&cli),
        Commands::Generate { max_len } => passnote::cli::commands::generate::execute(max_len),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "passnote", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        passnote::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `PASSNOTE_LOG` (default: warnings only).
fn init_logging() {
    let filter = EnvFilter::try_from_env("PASSNOTE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("passnote=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
