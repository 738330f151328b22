use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use vista_core::VERSION;

/// Vista - a private journal encrypted on your own device
#[derive(Parser)]
#[command(name = "vista")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the encrypted vault
    #[arg(long, global = true, env = "VISTA_VAULT")]
    pub vault: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Entry body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Entry date (YYYY-MM-DD or ISO-8601, default today)
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Entry ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New entry body
    #[arg(long)]
    pub body: Option<String>,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `search` command
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive)
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for commands that take a single entry ID
#[derive(Args)]
pub struct IdArgs {
    /// Entry ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Entry ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Entry ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Destination file (defaults to the configured backup directory)
    #[arg(value_name = "FILE")]
    pub destination: Option<String>,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// Backup file to restore
    #[arg(value_name = "FILE")]
    pub source: String,

    /// Replace existing data without asking
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Args)]
pub struct EventArgs {
    #[command(subcommand)]
    pub command: EventSubcommand,
}

/// Arguments for `event add`
#[derive(Args)]
pub struct EventAddArgs {
    /// Event title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Event day (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Local time of day (HH:MM, default 09:00)
    #[arg(long)]
    pub time: Option<String>,
}

/// Arguments for `event list`
#[derive(Args)]
pub struct EventListArgs {
    /// Include events that already happened
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum EventSubcommand {
    /// Add a calendar event
    Add(EventAddArgs),

    /// List upcoming events
    List(EventListArgs),

    /// Delete an event by ID
    Delete(IdArgs),
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show whether a vault exists and where it lives
    Status,

    /// Add a new journal entry
    Add(AddArgs),

    /// List entries, newest first
    List(ListArgs),

    /// Search entry text
    Search(SearchArgs),

    /// Show a specific entry by ID
    Show(ShowArgs),

    /// Replace the body of an entry
    Edit(EditArgs),

    /// Delete an entry
    Delete(DeleteArgs),

    /// Manage calendar events
    Event(EventArgs),

    /// Export the encrypted vault to a portable backup file
    Export(ExportArgs),

    /// Replace the vault with a backup file (destructive)
    Import(ImportArgs),

    /// Change the vault password
    Passwd,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_event_add() {
        let cli = Cli::try_parse_from([
            "vista", "event", "add", "Dentist", "--date", "2030-01-05", "--time", "15:00",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Event(EventArgs {
                command: EventSubcommand::Add(args),
            })) => {
                assert_eq!(args.title, "Dentist");
                assert_eq!(args.date, "2030-01-05");
                assert_eq!(args.time.as_deref(), Some("15:00"));
            }
            _ => panic!("expected event add"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vista", "list", "--vault", "/tmp/v", "-q", "--json"]).unwrap();
        assert_eq!(cli.vault.as_deref(), Some("/tmp/v"));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::List(ListArgs { json: true, .. }))));
    }

    #[test]
    fn test_import_requires_file() {
        assert!(Cli::try_parse_from(["vista", "import"]).is_err());
    }
}
