use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use respdiff_engine::InlineGranularity;

#[derive(Parser)]
#[command(
    name = "respdiff",
    about = "respdiff — colorized diffs between consecutive response bodies",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file holding a diff configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff two response bodies
    Diff(DiffArgs),
    /// Diff each capture in a JSON-lines file against the previous comparable one
    Replay(ReplayArgs),
}

/// Flags that override fields of the loaded configuration.
#[derive(Args, Clone, Debug, Default)]
pub struct EngineArgs {
    /// Skip diffing when either side is larger than this many bytes
    #[arg(long)]
    pub max_bytes: Option<usize>,
    /// Token model for inline highlights: word, token, or char
    #[arg(long)]
    pub granularity: Option<InlineGranularity>,
    /// Do not merge changed words separated only by whitespace
    #[arg(long)]
    pub no_merge: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// File holding the previous body
    pub previous: PathBuf,
    /// File holding the current body
    pub current: PathBuf,
    /// Print the flat delta list instead of decorations
    #[arg(long)]
    pub deltas: bool,
    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON-lines file of captures: {"protocol","host","port","body"}
    pub captures: PathBuf,
    /// Body to compare the first capture against
    #[arg(long)]
    pub seed: Option<PathBuf>,
    #[command(flatten)]
    pub engine: EngineArgs,
}
