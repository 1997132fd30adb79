//! Command-line argument definitions using clap

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::config::AnalysisConfig;

/// Loansift - Credit-risk analysis for loan datasets: prune, label,
/// normalize, rank risk indicators, and fit a random-forest baseline
#[derive(Parser, Debug)]
#[command(name = "loansift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Terminal loan-status column (consumed into the binary target)
    #[arg(long, default_value = "loan_status")]
    pub status_column: String,

    /// Textual loan-term column ("36 months" style)
    #[arg(long, default_value = "term")]
    pub term_column: String,

    /// Free-text employment-tenure column ("10+ years" style)
    #[arg(long, default_value = "emp_length")]
    pub emp_length_column: String,

    /// Letter-grade column (A through G)
    #[arg(long, default_value = "grade")]
    pub grade_column: String,

    /// Issuance-date column in Mon-YY format (e.g. Jun-15)
    #[arg(long, default_value = "issue_d")]
    pub issue_date_column: String,

    /// Keep a column only if at least this fraction of its values is present
    #[arg(long, default_value = "0.5", value_parser = validate_fraction)]
    pub missing_threshold: f64,

    /// Extra identifier/free-text columns to drop by name (comma-separated),
    /// on top of the built-in denylist
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Reference date for the months-since-issuance feature (YYYY-MM-DD)
    #[arg(long, default_value = "2025-12-01", value_parser = parse_reference_date)]
    pub reference_date: NaiveDate,

    /// Random seed for the stratified split and the forest
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Fraction of rows held out for testing
    #[arg(long, default_value = "0.2", value_parser = validate_fraction)]
    pub test_ratio: f64,

    /// Number of trees in the forest
    #[arg(long, default_value = "100")]
    pub trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "10")]
    pub max_depth: usize,

    /// How many correlations and feature importances to report
    #[arg(long, default_value = "10")]
    pub top_n: usize,

    /// Optional path to save the prepared feature table (CSV or Parquet)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON report path. Defaults to the input directory with an
    /// '_analysis.json' suffix (e.g. loans.csv → loans_analysis.json)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip the interactive confirmation before model training
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Get the JSON report path, derived from the input file when not
    /// explicitly provided.
    pub fn report_path(&self) -> PathBuf {
        self.report.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("loansift");
            parent.join(format!("{}_analysis.json", stem))
        })
    }

    /// Build the run configuration from the parsed arguments.
    pub fn to_config(&self) -> AnalysisConfig {
        let mut config = AnalysisConfig {
            status_column: self.status_column.clone(),
            term_column: self.term_column.clone(),
            emp_length_column: self.emp_length_column.clone(),
            grade_column: self.grade_column.clone(),
            issue_date_column: self.issue_date_column.clone(),
            missing_threshold: self.missing_threshold,
            reference_date: self.reference_date,
            seed: self.seed,
            test_ratio: self.test_ratio,
            trees: self.trees,
            max_depth: self.max_depth,
            top_n: self.top_n,
            ..AnalysisConfig::default()
        };
        config
            .drop_columns
            .extend(self.drop_columns.iter().cloned());
        config
    }
}

/// Validator for ratio parameters that must sit strictly inside (0, 1)
fn validate_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(value > 0.0 && value < 1.0) {
        Err(format!(
            "value must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for the reference date argument
fn parse_reference_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a valid date (expected YYYY-MM-DD)", s))
}
