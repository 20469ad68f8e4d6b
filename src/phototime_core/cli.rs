use clap::{Args, Parser, Subcommand, ValueEnum};
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fix media file timestamps from export sidecar metadata")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable file logging to phototime.log
    #[arg(long = "log", global = true)]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug, global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match media files to their sidecars and report timestamp mismatches
    Scan {
        /// Directory containing exported media and sidecars
        #[arg(required = true)]
        dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Set the timestamps of every mismatched media file to its sidecar's capture time.
    ///
    /// Both modification time and, where the platform allows it, creation time
    /// are rewritten. The directory is scanned again afterwards to show the
    /// resulting state.
    Fix {
        /// Directory containing exported media and sidecars
        #[arg(required = true)]
        dir: PathBuf,

        /// Show what would be changed without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Set the timestamps of a single file
    Set {
        /// File to update
        #[arg(required = true)]
        file: PathBuf,

        /// Target time in milliseconds since the Unix epoch
        #[arg(required = true, allow_negative_numbers = true)]
        epoch_millis: i64,
    },
}

/// Options that change how media files are matched to sidecars.
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// File name marker of edited copies (e.g. "-edited")
    #[arg(long)]
    pub edited_marker: Option<String>,

    /// Compare calendar days at this UTC offset (e.g. "+02:00") instead of the local zone
    #[arg(long)]
    pub utc_offset: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Media needing attention, one path per line
    Paths,
    /// JSON output
    Json,
    /// Summary and table of mismatches
    Table,
}
