use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use animehub_core::library::StatusFilter;
use animehub_core::models::WatchStatus;

/// Personal anime library: track progress, see stats, import from the catalog.
#[derive(Debug, Parser)]
#[command(name = "animehub", version)]
pub struct Cli {
    /// Library database file (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Unlock edit mode for this invocation
    #[arg(long, global = true)]
    pub pin: Option<String>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run; starts the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// List library entries
    List {
        /// `all` or one status (watching, rewatching, completed, on-hold, dropped, plan)
        #[arg(short, long)]
        filter: Option<StatusFilter>,
    },
    /// Library statistics and recommendations
    Stats,
    /// Recommendations only
    Recommend,
    /// Add an entry by hand
    Add(AddArgs),
    /// Mark one more episode watched
    Bump { local_id: String },
    /// Change an entry's status
    Status {
        local_id: String,
        status: WatchStatus,
    },
    /// Remove an entry
    Remove { local_id: String },
    /// Show the bingo card or toggle a cell
    Bingo {
        #[command(subcommand)]
        action: Option<BingoAction>,
    },
    /// Search the catalog by title
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show catalog details for an anime, optionally adding it to the library
    Details {
        id: u64,
        #[arg(long)]
        import: bool,
    },
    /// Anime airing this season
    Season,
    /// Quote of the day
    Quote,
    /// Unlock edit mode
    Unlock {
        #[arg(value_name = "PIN")]
        code: String,
    },
    /// Lock edit mode
    Lock,
    /// Show the config path, or write the default config there
    Config {
        #[arg(long)]
        init: bool,
    },
    /// Interactive shell; edit mode persists until `lock` or exit
    Shell,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileAction {
    /// Save name and avatar URL
    Set {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        avatar: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum BingoAction {
    /// Flip a cell (0-8)
    Toggle { index: usize },
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
    /// Total episodes (0 or absent: unknown)
    #[arg(long)]
    pub total: Option<u32>,
    /// Minutes per episode (default 24)
    #[arg(long)]
    pub minutes: Option<f64>,
    /// Episodes already watched
    #[arg(long, default_value_t = 0)]
    pub watched: u32,
    #[arg(long, default_value = "watching")]
    pub status: WatchStatus,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,
}

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    #[command(flatten)]
    App(Command),
    /// Filter the `list` view for the rest of the session
    Filter { filter: StatusFilter },
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}
