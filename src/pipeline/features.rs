//! Feature normalization: text and date columns to numeric encodings
//!
//! Four independent per-column transforms: term duration, employment
//! tenure, ordinal grade, and issuance recency. Term parsing is a hard
//! requirement; tenure defaults to 0 when missing or unparseable, which
//! conflates "no experience" with "unrecorded" — a modeling decision
//! inherited from the source analysis and worth revisiting, kept as-is
//! rather than silently unified with the term behavior.

use anyhow::Result;
use chrono::NaiveDate;
use polars::prelude::*;

use super::error::PipelineError;
use crate::config::{AnalysisConfig, DAYS_PER_MONTH};

/// Grade codes in strictly increasing risk order; ordinal = index + 1.
pub const GRADE_SCALE: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

/// Outcome of the normalization stage.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Columns converted to numeric encodings.
    pub converted: Vec<String>,
    /// Optional columns skipped because pruning removed them.
    pub skipped: Vec<String>,
    /// Name of the derived months-since-issuance column.
    pub recency_column: String,
}

/// Leading integer substring of `text`, ignoring leading whitespace.
///
/// `"36 months"` → 36, `"10+ years"` → 10, `"< 1 year"` → None (the
/// string does not lead with a digit).
pub fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Ordinal risk value for a grade code (A=1 … G=7).
pub fn grade_ordinal(code: &str) -> Option<i64> {
    GRADE_SCALE
        .iter()
        .position(|g| *g == code)
        .map(|i| i as i64 + 1)
}

/// Parse an issuance month in `Mon-YY` format to the first of that month.
pub fn parse_issue_month(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("01-{}", text.trim()), "%d-%b-%y").ok()
}

/// Elapsed whole months between `date` and `reference`, rounded to the
/// nearest integer using the 30.44 days/month convention.
pub fn months_between(date: NaiveDate, reference: NaiveDate) -> i64 {
    let days = reference.signed_duration_since(date).num_days() as f64;
    (days / DAYS_PER_MONTH).round() as i64
}

/// Replace a textual duration column with its parsed integer months.
/// Every row must parse; a null or digit-free value is fatal.
pub fn parse_term(df: &mut DataFrame, column: &str) -> Result<()> {
    let values = df
        .column(column)
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?
        .str()
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?;

    let mut parsed: Vec<i64> = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        let text = value.ok_or_else(|| PipelineError::Parse {
            field: column.to_string(),
            value: "<null>".to_string(),
            row,
        })?;
        let months = leading_integer(text).ok_or_else(|| PipelineError::Parse {
            field: column.to_string(),
            value: text.to_string(),
            row,
        })?;
        parsed.push(months);
    }

    df.with_column(Column::new(column.into(), parsed))?;
    Ok(())
}

/// Replace a free-text tenure column with parsed years; missing or
/// unparseable values become 0.
pub fn parse_tenure(df: &mut DataFrame, column: &str) -> Result<()> {
    let values = df
        .column(column)
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?
        .str()
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?;

    let parsed: Vec<i64> = values
        .into_iter()
        .map(|value| value.and_then(leading_integer).unwrap_or(0))
        .collect();

    df.with_column(Column::new(column.into(), parsed))?;
    Ok(())
}

/// Replace a letter-grade column with its ordinal encoding. A code
/// outside A..G (or a null) is fatal.
pub fn encode_grade(df: &mut DataFrame, column: &str) -> Result<()> {
    let values = df
        .column(column)
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?
        .str()
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?;

    let mut encoded: Vec<i64> = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        let code = value.ok_or_else(|| PipelineError::UnknownGrade {
            code: "<null>".to_string(),
            row,
        })?;
        let ordinal = grade_ordinal(code).ok_or_else(|| PipelineError::UnknownGrade {
            code: code.to_string(),
            row,
        })?;
        encoded.push(ordinal);
    }

    df.with_column(Column::new(column.into(), encoded))?;
    Ok(())
}

/// Derive a months-since-issuance column from a `Mon-YY` date column.
/// The original date column is left in place for the caller to drop.
pub fn issue_recency(
    df: &mut DataFrame,
    column: &str,
    new_column: &str,
    reference: NaiveDate,
) -> Result<()> {
    let values = df
        .column(column)
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?
        .str()
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?;

    let mut months: Vec<i64> = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        let text = value.ok_or_else(|| PipelineError::Parse {
            field: column.to_string(),
            value: "<null>".to_string(),
            row,
        })?;
        let date = parse_issue_month(text).ok_or_else(|| PipelineError::Parse {
            field: column.to_string(),
            value: text.to_string(),
            row,
        })?;
        months.push(months_between(date, reference));
    }

    df.with_column(Column::new(new_column.into(), months))?;
    Ok(())
}

/// Run all four transforms against the table.
///
/// Term, tenure, and grade are applied when their column survived
/// pruning (skips are recorded, not errors); the issuance date is
/// required. Afterwards the consumed date and status columns are
/// dropped — their numeric stand-ins (recency, target) replace them.
pub fn normalize_features(df: DataFrame, config: &AnalysisConfig) -> Result<(DataFrame, NormalizeOutcome)> {
    let mut df = df;
    let mut outcome = NormalizeOutcome::default();

    for column in [&config.term_column, &config.emp_length_column, &config.grade_column] {
        if df.column(column).is_err() {
            outcome.skipped.push(column.clone());
        }
    }

    if df.column(&config.term_column).is_ok() {
        parse_term(&mut df, &config.term_column)?;
        outcome.converted.push(config.term_column.clone());
    }
    if df.column(&config.emp_length_column).is_ok() {
        parse_tenure(&mut df, &config.emp_length_column)?;
        outcome.converted.push(config.emp_length_column.clone());
    }
    if df.column(&config.grade_column).is_ok() {
        encode_grade(&mut df, &config.grade_column)?;
        outcome.converted.push(config.grade_column.clone());
    }

    let recency_column = format!("mths_since_{}", config.issue_date_column);
    issue_recency(
        &mut df,
        &config.issue_date_column,
        &recency_column,
        config.reference_date,
    )?;
    outcome.converted.push(recency_column.clone());
    outcome.recency_column = recency_column;

    // The date and status columns are consumed; their numeric
    // equivalents carry the signal from here on.
    let df = df.drop_many([
        config.issue_date_column.clone(),
        config.status_column.clone(),
    ]);

    Ok((df, outcome))
}
