//! Target derivation from the loan's terminal status
//!
//! A loan is "bad" when its status is an exact member of the closed
//! `BAD_LOAN_STATUSES` set; every other non-null status is "good". Note
//! that "Late (31-120 days)" counts as bad while "Late (16-30 days)" does
//! not — a business rule inherited from the source analysis, not to be
//! altered without domain sign-off.

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::error::PipelineError;

/// Terminal statuses labeled 1 ("bad loan"). Exact string match.
pub const BAD_LOAN_STATUSES: [&str; 4] = [
    "Charged Off",
    "Default",
    "Does not meet the credit policy. Status:Charged Off",
    "Late (31-120 days)",
];

/// Counts of good (0) and bad (1) loans after derivation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LabelDistribution {
    pub good: usize,
    pub bad: usize,
}

impl LabelDistribution {
    pub fn total(&self) -> usize {
        self.good + self.bad
    }

    /// Fraction of rows labeled bad, in [0, 1].
    pub fn bad_fraction(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.bad as f64 / self.total() as f64
        }
    }
}

/// Whether a status string falls in the bad set.
pub fn is_bad_status(status: &str) -> bool {
    BAD_LOAN_STATUSES.contains(&status)
}

/// Append a binary target column derived from the status column.
///
/// Every row must carry a non-null status; the status column itself is
/// left in place (it is dropped later, together with the issuance date).
pub fn derive_target(
    df: &mut DataFrame,
    status_column: &str,
    target_column: &str,
) -> Result<LabelDistribution> {
    let status = df
        .column(status_column)
        .map_err(|_| PipelineError::MissingColumn(status_column.to_string()))?;

    let status = status
        .str()
        .map_err(|_| PipelineError::MissingColumn(status_column.to_string()))?;

    let mut labels: Vec<i32> = Vec::with_capacity(status.len());
    let mut bad = 0usize;

    for (row, value) in status.into_iter().enumerate() {
        match value {
            Some(s) if is_bad_status(s) => {
                bad += 1;
                labels.push(1);
            }
            Some(_) => labels.push(0),
            None => return Err(PipelineError::MissingStatus(row).into()),
        }
    }

    let good = labels.len() - bad;
    df.with_column(Column::new(target_column.into(), labels))?;

    Ok(LabelDistribution { good, bad })
}
