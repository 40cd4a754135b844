//! `batch` command: run the matching pass over every active diner.

use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use clap::Parser;
use dinematch_batch::{BatchSettings, MatchingService, MemorySink, SinkSnapshot};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::inputs::{
    load_dataset, load_scoring_model, parse_now, require_existing, scoring_time, write_json,
};
use crate::{ARG_DATASET, ARG_NOW, ARG_OUTPUT, ARG_WEIGHTS, CliError, ENV_BATCH_DATASET};

/// CLI arguments for the `batch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank restaurants for every active diner in a JSON dataset, \
                 create offers and print the run summary. With --output the \
                 offers, stored results and execution log are written as a \
                 JSON report.",
    about = "Run the matching pass for every active diner"
)]
#[ortho_config(prefix = "DINEMATCH")]
pub(crate) struct BatchArgs {
    /// Path to the JSON dataset of users, restaurants and visits.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Path of the JSON report to write.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Path to a JSON weight configuration overriding the defaults.
    #[arg(long = ARG_WEIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
    /// Scoring time as an RFC 3339 timestamp; defaults to now.
    #[arg(long = ARG_NOW, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) now: Option<String>,
}

impl BatchArgs {
    pub(crate) fn into_config(self) -> Result<BatchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BatchConfig::try_from(merged)
    }
}

/// Resolved `batch` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BatchConfig {
    pub(crate) dataset: Utf8PathBuf,
    pub(crate) output: Option<Utf8PathBuf>,
    pub(crate) weights: Option<Utf8PathBuf>,
    pub(crate) now: Option<DateTime<Utc>>,
}

impl BatchConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.dataset, ARG_DATASET)?;
        if let Some(weights) = &self.weights {
            require_existing(weights, ARG_WEIGHTS)?;
        }
        Ok(())
    }
}

impl TryFrom<BatchArgs> for BatchConfig {
    type Error = CliError;

    fn try_from(args: BatchArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_BATCH_DATASET,
        })?;
        let now = parse_now(args.now.as_deref())?;
        Ok(Self {
            dataset,
            output: args.output,
            weights: args.weights,
            now,
        })
    }
}

pub(super) fn run_batch(args: BatchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_batch_with(args, &mut stdout)
}

pub(super) fn run_batch_with(args: BatchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    execute_batch(&config, writer)
}

pub(super) fn execute_batch(config: &BatchConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let dataset = load_dataset(&config.dataset)?;
    let model = load_scoring_model(config.weights.as_deref())?;
    let settings = BatchSettings {
        matches_per_user: model.config().max_recommendations,
        ..BatchSettings::default()
    };
    let sink = MemorySink::default();
    let service = MatchingService::new(&dataset, &sink, &sink, model, settings);
    let summary = service.run_all(scoring_time(config.now))?;
    if let Some(output) = &config.output {
        write_report(output, &sink.snapshot()?)?;
        log::info!("wrote matching report to {output}");
    }
    write_json(writer, &summary)
}

fn write_report(path: &Utf8Path, snapshot: &SinkSnapshot) -> Result<(), CliError> {
    let write_err = |source| CliError::WriteReport {
        path: path.to_path_buf(),
        source,
    };
    let file = dinematch_fs::create_utf8_file(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot).map_err(CliError::SerialiseOutput)?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BatchConfig, CliError> {
    let merged = BatchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    BatchConfig::try_from(merged)
}
