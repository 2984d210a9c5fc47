use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The slategrid developers",
    version,
    about = "slategrid CLI - Score artifact and slate placements on an inventory grid, or hand them to an external optimizer.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the buff map and score of a layout.
    Score(ScoreArgs),
    /// Send a layout to the external optimizer and show the optimized placement.
    Optimize(OptimizeArgs),
}

/// Inputs shared by every command that builds a placement session.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Path to the item catalog in JSON format.
    #[arg(long, required = true, value_name = "PATH")]
    pub catalog: PathBuf,

    /// Path to the layout file (owned stock, placements, global modes) in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub layout: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Grid Overrides ---
    /// Override the number of grid columns.
    #[arg(long, value_name = "INT")]
    pub width: Option<usize>,

    /// Override the smallest allowed slot count.
    #[arg(long, value_name = "INT")]
    pub min_slots: Option<usize>,

    /// Override the largest allowed slot count.
    #[arg(long, value_name = "INT")]
    pub max_slots: Option<usize>,

    /// Override the raw total that maps to a score of 100.
    #[arg(long, value_name = "FLOAT")]
    pub max_score: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S grid.width=8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Only print the score, without the annotated grid.
    #[arg(long)]
    pub summary: bool,
}

/// Optimizer connection overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct OptimizerArgs {
    /// Override the optimizer endpoint URL.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Override the optimizer request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the `optimize` subcommand.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(flatten)]
    pub optimizer: OptimizerArgs,

    /// Print the optimizer request as JSON instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}
