//! Command-line interface for the dinematch recommendation engine.
//!
//! `rank` scores one diner against a JSON dataset; `batch` runs the monthly
//! matching pass over every active diner.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod batch;
mod error;
mod inputs;
mod rank;

pub use error::CliError;

use batch::BatchArgs;
use rank::RankArgs;

pub(crate) const ARG_USER_ID: &str = "user-id";
pub(crate) const ARG_DATASET: &str = "dataset";
pub(crate) const ARG_WEIGHTS: &str = "weights";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_NOW: &str = "now";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_RANK_USER_ID: &str = "DINEMATCH_CMDS_RANK_USER_ID";
pub(crate) const ENV_RANK_DATASET: &str = "DINEMATCH_CMDS_RANK_DATASET";
pub(crate) const ENV_BATCH_DATASET: &str = "DINEMATCH_CMDS_BATCH_DATASET";

/// Run the dinematch CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, input loading
/// or matching fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => rank::run_rank(args),
        Command::Batch(args) => batch::run_batch(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "dinematch",
    about = "Score and rank restaurant recommendations for diners",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank restaurants for a single diner.
    Rank(RankArgs),
    /// Run the matching pass for every active diner.
    Batch(BatchArgs),
}

#[cfg(test)]
mod tests;
