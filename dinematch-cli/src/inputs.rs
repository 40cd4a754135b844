//! Loading and validating command inputs.

use std::io::{BufReader, Write};

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use dinematch_batch::JsonDataset;
use dinematch_core::{ScoringModel, WeightConfig};
use dinematch_fs::open_utf8_file;
use serde::Serialize;

use crate::{ARG_DATASET, ARG_NOW, ARG_WEIGHTS, CliError};

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match dinematch_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse an optional RFC 3339 scoring time.
pub(crate) fn parse_now(value: Option<&str>) -> Result<Option<DateTime<Utc>>, CliError> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|source| CliError::InvalidTimestamp {
                    value: raw.to_owned(),
                    source,
                })
        })
        .transpose()
}

/// Decode a [`JsonDataset`] from disk.
pub(crate) fn load_dataset(path: &Utf8Path) -> Result<JsonDataset, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field: ARG_DATASET,
        path: path.to_path_buf(),
        source,
    })?;
    let dataset =
        JsonDataset::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseDataset {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!(
        "loaded dataset {path}: {} users, {} restaurants, {} visits",
        dataset.users.len(),
        dataset.restaurants.len(),
        dataset.visits.len()
    );
    Ok(dataset)
}

/// Build the scoring model, reading weights from `path` when given.
pub(crate) fn load_scoring_model(path: Option<&Utf8Path>) -> Result<ScoringModel, CliError> {
    let Some(path) = path else {
        return Ok(ScoringModel::default());
    };
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field: ARG_WEIGHTS,
        path: path.to_path_buf(),
        source,
    })?;
    let config: WeightConfig =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseWeights {
            path: path.to_path_buf(),
            source,
        })?;
    ScoringModel::with_config(config).map_err(|source| CliError::InvalidWeights {
        path: path.to_path_buf(),
        source,
    })
}

/// Scoring time for a command: the supplied value or the current time.
pub(crate) fn scoring_time(now: Option<DateTime<Utc>>) -> DateTime<Utc> {
    now.unwrap_or_else(|| {
        let current = Utc::now();
        log::debug!("no --{ARG_NOW} given; scoring at {current}");
        current
    })
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
