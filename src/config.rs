//! Run configuration shared by every pipeline stage
//!
//! All tunable process state (reference date, random seed, split ratio,
//! missingness threshold, column names, forest hyperparameters) lives in
//! one explicit structure so a run is reproducible under different
//! parameters.

use chrono::NaiveDate;

/// Identifier / free-text / constant columns dropped by name during
/// pruning. Names not present in the dataset are ignored.
pub const DEFAULT_DROP_COLUMNS: [&str; 8] = [
    "Unnamed: 0",
    "id",
    "member_id",
    "url",
    "title",
    "zip_code",
    "policy_code",
    "application_type",
];

/// Average Gregorian month length in days, used for issuance recency.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Configuration for a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Terminal loan status column (consumed by label derivation).
    pub status_column: String,
    /// Derived binary target column name.
    pub target_column: String,
    /// Textual loan-term column ("36 months" style).
    pub term_column: String,
    /// Free-text employment-tenure column ("10+ years" style).
    pub emp_length_column: String,
    /// Letter-grade column (A through G).
    pub grade_column: String,
    /// Issuance-date column in `Mon-YY` format.
    pub issue_date_column: String,
    /// Keep a column only if its present-value count is at least
    /// `missing_threshold * rows`.
    pub missing_threshold: f64,
    /// Columns dropped by name after the missingness pass.
    pub drop_columns: Vec<String>,
    /// Reference date for the months-since-issuance feature.
    pub reference_date: NaiveDate,
    /// Seed for the stratified split and the forest.
    pub seed: u64,
    /// Fraction of rows held out for testing.
    pub test_ratio: f64,
    /// Number of trees in the forest.
    pub trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// How many correlations / importances to report.
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            status_column: "loan_status".to_string(),
            target_column: "target".to_string(),
            term_column: "term".to_string(),
            emp_length_column: "emp_length".to_string(),
            grade_column: "grade".to_string(),
            issue_date_column: "issue_d".to_string(),
            missing_threshold: 0.5,
            drop_columns: DEFAULT_DROP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            // Fixed reference point for payment-history depth, not "today".
            reference_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            seed: 42,
            test_ratio: 0.2,
            trees: 100,
            max_depth: 10,
            top_n: 10,
        }
    }
}
