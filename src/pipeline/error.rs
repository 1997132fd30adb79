//! Error taxonomy for the analysis pipeline.
//!
//! Every variant is fatal to the run: once an upstream transform has
//! failed, no partial output table is considered valid.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the pipeline stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file absent, unreadable, or of an unsupported format.
    #[error("cannot read input file '{path}': {reason}")]
    File { path: PathBuf, reason: String },

    /// A column the pipeline requires by name is not in the dataset.
    #[error("required column '{0}' not found in dataset")]
    MissingColumn(String),

    /// The status column holds a null where label derivation needs a value.
    #[error("status value missing at row {0}")]
    MissingStatus(usize),

    /// Malformed duration or date text in a required field.
    #[error("could not parse {field} value '{value}' at row {row}")]
    Parse {
        field: String,
        value: String,
        row: usize,
    },

    /// Grade code outside the known A..G set.
    #[error("unknown grade code '{code}' at row {row} (expected A through G)")]
    UnknownGrade { code: String, row: usize },

    /// A target class has no examples, so a stratified split is impossible.
    #[error("cannot stratify split: class {class} has no examples")]
    Stratification { class: i32 },
}
