use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "readiness",
    version,
    about = "Interview readiness scoring from preparation signals"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every scheduled interview in a data directory
    Score(ScoreCommand),
    /// Validate configuration and report what each source yields
    Check(CheckCommand),
    /// Rescore whenever the data directory changes
    Watch(WatchCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD); defaults to the current time
    #[arg(long)]
    pub now: Option<String>,
    /// Only report this interview
    #[arg(long)]
    pub interview: Option<String>,
}

#[derive(Args)]
pub struct CheckCommand {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct WatchCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    #[arg(long, default_value_t = 5)]
    pub interval_secs: u64,
    /// Stop after this many polling cycles
    #[arg(long)]
    pub max_cycles: Option<u32>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
