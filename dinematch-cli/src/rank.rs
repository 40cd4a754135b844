//! `rank` command: shortlist restaurants for one diner.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use dinematch_batch::{BatchSettings, MatchingService, MemorySink};
use dinematch_core::UserId;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::inputs::{
    load_dataset, load_scoring_model, parse_now, require_existing, scoring_time, write_json,
};
use crate::{
    ARG_DATASET, ARG_LIMIT, ARG_NOW, ARG_USER_ID, ARG_WEIGHTS, CliError, ENV_RANK_DATASET,
    ENV_RANK_USER_ID,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the restaurants in a diner's neighbourhood, create \
                 offers for the shortlist and print both as JSON. Inputs can \
                 come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Rank restaurants for one diner"
)]
#[ortho_config(prefix = "DINEMATCH")]
pub(crate) struct RankArgs {
    /// Identifier of the diner to rank for.
    #[arg(value_name = "user-id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// Path to the JSON dataset of users, restaurants and visits.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Path to a JSON weight configuration overriding the defaults.
    #[arg(long = ARG_WEIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
    /// Maximum number of restaurants to return.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Scoring time as an RFC 3339 timestamp; defaults to now.
    #[arg(long = ARG_NOW, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) now: Option<String>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankConfig {
    pub(crate) user_id: UserId,
    pub(crate) dataset: Utf8PathBuf,
    pub(crate) weights: Option<Utf8PathBuf>,
    pub(crate) limit: Option<usize>,
    pub(crate) now: Option<DateTime<Utc>>,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.dataset, ARG_DATASET)?;
        if let Some(weights) = &self.weights {
            require_existing(weights, ARG_WEIGHTS)?;
        }
        Ok(())
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let user_id = args.user_id.ok_or(CliError::MissingArgument {
            field: ARG_USER_ID,
            env: ENV_RANK_USER_ID,
        })?;
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_RANK_DATASET,
        })?;
        let now = parse_now(args.now.as_deref())?;
        Ok(Self {
            user_id: UserId::new(user_id),
            dataset,
            weights: args.weights,
            limit: args.limit,
            now,
        })
    }
}

pub(super) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(super) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    execute_rank(&config, writer)
}

pub(super) fn execute_rank(config: &RankConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let dataset = load_dataset(&config.dataset)?;
    let model = load_scoring_model(config.weights.as_deref())?;
    let settings = BatchSettings {
        matches_per_user: config
            .limit
            .unwrap_or(model.config().max_recommendations),
        ..BatchSettings::default()
    };
    let sink = MemorySink::default();
    let service = MatchingService::new(&dataset, &sink, &sink, model, settings);
    let processed = service.process_user(&config.user_id, scoring_time(config.now))?;
    write_json(writer, &processed)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
