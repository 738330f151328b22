//! Vista CLI - a private journal encrypted on your own device
//!
//! This is the command-line interface for Vista. Entries and events are
//! sealed with a key derived from your password and never written in the clear.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vista_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, EventSubcommand};
use crate::commands::{backup, entries, events, maintenance};
use crate::constants::env_vars;
use crate::errors::exit_code_for;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let error_msg = format!("{}", e);
        eprintln!("Error: {}", error_msg);
        if let Some(hint) = extract_error_hint(&error_msg) {
            eprintln!("{}", hint);
        }
        std::process::exit(exit_code_for(&e));
    }
}

/// Log to stderr, filtered by VISTA_LOG (default `warn`, `debug` with --verbose).
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(env_vars::LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Contextual hints for errors that do not carry their own.
fn extract_error_hint(error: &str) -> Option<String> {
    if error.contains("\nHint:") {
        return None;
    }

    let error_lower = error.to_lowercase();

    if error_lower.contains("wrong password or corrupted data") {
        return Some(format!(
            "Hint: Check your password, or unset {} if it holds an old one.",
            env_vars::PASSPHRASE
        ));
    }

    if error_lower.contains("has no salt") {
        return Some(
            "Hint: The salt file is missing. Restore it from a backup with `vista import <file>`."
                .to_string(),
        );
    }

    if error_lower.contains("malformed backup") {
        return Some(
            "Hint: Only files written by `vista export` can be imported. The vault was not changed."
                .to_string(),
        );
    }

    if error_lower.contains("nothing to export") {
        return Some("Hint: Add an entry first with `vista add`.".to_string());
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Status) => {
            maintenance::handle_status(ctx)?;
        }
        Some(Commands::Add(args)) => {
            entries::handle_add(ctx, args)?;
        }
        Some(Commands::List(args)) => {
            entries::handle_list(ctx, args)?;
        }
        Some(Commands::Search(args)) => {
            entries::handle_search(ctx, args)?;
        }
        Some(Commands::Show(args)) => {
            entries::handle_show(ctx, args)?;
        }
        Some(Commands::Edit(args)) => {
            entries::handle_edit(ctx, args)?;
        }
        Some(Commands::Delete(args)) => {
            entries::handle_delete(ctx, args)?;
        }
        Some(Commands::Event(args)) => match &args.command {
            EventSubcommand::Add(add_args) => {
                events::handle_add(ctx, add_args)?;
            }
            EventSubcommand::List(list_args) => {
                events::handle_list(ctx, list_args)?;
            }
            EventSubcommand::Delete(delete_args) => {
                events::handle_delete(ctx, delete_args)?;
            }
        },
        Some(Commands::Export(args)) => {
            backup::handle_export(ctx, args)?;
        }
        Some(Commands::Import(args)) => {
            backup::handle_import(ctx, args)?;
        }
        Some(Commands::Passwd) => {
            maintenance::handle_passwd(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            maintenance::handle_completions(args)?;
        }
        None => {
            println!("Vista v{}", VERSION);
            println!("\nQuickstart:");
            println!("  vista add --body \"Hello\"");
            println!("  vista list");
            println!("  vista search \"hello\"");
            println!("  vista event add \"Dentist\" --date 2030-01-05 --time 15:00");
            println!("  vista export vista-backup.json");
            println!("\nRun `vista --help` for full usage.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_for_wrong_password() {
        let hint = extract_error_hint("Wrong password or corrupted data").unwrap();
        assert!(hint.contains("VISTA_PASSPHRASE"));
    }

    #[test]
    fn test_no_hint_when_message_has_one() {
        assert_eq!(
            extract_error_hint("Entry abc not found\nHint: Run `vista list`."),
            None
        );
        assert_eq!(extract_error_hint("disk on fire"), None);
    }
}
