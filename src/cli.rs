use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::mask::DEFAULT_USEFULNESS_THRESHOLD;
use crate::model::score::SignalKind;
use crate::report::OutputFormat;

/// Upper bound on `show --count`.
pub const MAX_SHOW_COUNT: u32 = 10_000;

#[derive(Debug, Parser)]
#[command(
    name = "review-lens",
    version,
    about = "Score restaurant reviews from LLM rating-token logits and browse labelled reviews"
)]
pub struct Cli {
    /// Log progress to stderr (overridden by REVIEW_LENS_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show random labelled reviews with their masked category scores.
    Show(ShowArgs),
    /// Interactive viewer: Enter draws a new review, `q` quits.
    Browse(BrowseArgs),
    /// Score one set of answer-token signals for ratings 1-5 and NOT.
    Score(ScoreArgs),
    /// Convert a table of raw answer-token signals into a labelled table.
    Label(LabelArgs),
    /// Per-category coverage and score statistics for a labelled table.
    Stats(StatsArgs),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct MaskArgs {
    /// Scores whose usefulness is below this value are shown as 0.
    #[arg(long, default_value_t = DEFAULT_USEFULNESS_THRESHOLD)]
    pub threshold: f64,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Labelled review table (CSV, optionally .gz).
    #[arg(long)]
    pub data: PathBuf,
    #[command(flatten)]
    pub mask: MaskArgs,
    /// Seed for reproducible sampling.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of reviews: one initial draw plus refreshes.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SHOW_COUNT))
    )]
    pub count: u32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    #[arg(long)]
    pub data: PathBuf,
    #[command(flatten)]
    pub mask: MaskArgs,
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Six values: ratings 1..5 then NOT.
    #[arg(num_args = 6, required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
    /// Treat values as probabilities instead of logits.
    #[arg(long)]
    pub probabilities: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct LabelArgs {
    /// Table with `text` and `<CATEGORY>_1`..`_5`, `<CATEGORY>_NOT` columns.
    #[arg(long)]
    pub input: PathBuf,
    #[arg(long)]
    pub out: PathBuf,
    #[arg(long)]
    pub probabilities: bool,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(long)]
    pub data: PathBuf,
    #[command(flatten)]
    pub mask: MaskArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn signal_kind(probabilities: bool) -> SignalKind {
    if probabilities {
        SignalKind::Probabilities
    } else {
        SignalKind::Logits
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/cli.rs"]
mod tests;
