//! Error types emitted by the dinematch CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use dinematch_batch::{BatchError, SinkError};
use dinematch_core::WeightConfigError;
use thiserror::Error;

/// Errors emitted by the dinematch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name of the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name of the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name of the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The scoring time is not an RFC 3339 timestamp.
    #[error("invalid --now timestamp {value:?}: {source}")]
    InvalidTimestamp {
        /// Value as supplied.
        value: String,
        /// Parser failure.
        #[source]
        source: chrono::ParseError,
    },
    /// Opening an input file failed.
    #[error("failed to open {field} at {path:?}: {source}")]
    OpenInput {
        /// Flag name of the input.
        field: &'static str,
        /// Path being opened.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The dataset JSON could not be decoded.
    #[error("failed to parse dataset JSON at {path:?}: {source}")]
    ParseDataset {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The weights JSON could not be decoded.
    #[error("failed to parse weights JSON at {path:?}: {source}")]
    ParseWeights {
        /// Weights path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The weights decoded but failed validation.
    #[error("weights in {path:?} are invalid: {source}")]
    InvalidWeights {
        /// Weights path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: WeightConfigError,
    },
    /// The matching service failed.
    #[error("matching failed: {0}")]
    Matching(#[from] BatchError),
    /// Reading back the in-memory sink failed.
    #[error("failed to read matching results: {0}")]
    ReadSink(#[from] SinkError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing the report file failed.
    #[error("failed to write report to {path:?}: {source}")]
    WriteReport {
        /// Report path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
}
