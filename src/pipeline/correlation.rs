//! Correlation ranking of numeric features against the target

use anyhow::Result;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::error::PipelineError;

/// A feature's Pearson correlation against the target column.
#[derive(Debug, Clone, Serialize)]
pub struct TargetCorrelation {
    pub feature: String,
    pub correlation: f64,
}

/// Rank every numeric column by its Pearson correlation against the
/// target, descending, and keep the top `top_n` (the target's
/// self-correlation of 1.0 is excluded). Constant and all-null columns
/// produce no entry. Purely observational.
pub fn rank_target_correlations(
    df: &DataFrame,
    target_column: &str,
    top_n: usize,
) -> Result<Vec<TargetCorrelation>> {
    let target = df
        .column(target_column)
        .map_err(|_| PipelineError::MissingColumn(target_column.to_string()))?
        .cast(&DataType::Float64)?;

    // Numeric columns only - cast all to Float64 for the correlation pass
    let numeric_cols: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric() && col.name().as_str() != target_column)
        .map(|col| col.name().to_string())
        .collect();

    let float_columns: Vec<(String, Column)> = numeric_cols
        .iter()
        .filter_map(|col_name| {
            df.column(col_name)
                .ok()
                .and_then(|col| col.cast(&DataType::Float64).ok())
                .map(|col| (col_name.clone(), col))
        })
        .collect();

    let mut ranked: Vec<TargetCorrelation> = float_columns
        .par_iter()
        .filter_map(|(name, col)| {
            pearson_correlation(col, &target).map(|correlation| TargetCorrelation {
                feature: name.clone(),
                correlation,
            })
        })
        .collect();

    // Descending by signed correlation, matching the reference ranking
    ranked.sort_by(|a, b| {
        b.correlation
            .partial_cmp(&a.correlation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_n);

    Ok(ranked)
}

/// Single-pass Welford Pearson correlation between two Float64 columns.
/// Rows where either side is null are skipped. Returns None for
/// constant columns or when fewer than two paired values exist.
fn pearson_correlation(s1: &Column, s2: &Column) -> Option<f64> {
    let ca1 = s1.f64().ok()?;
    let ca2 = s2.f64().ok()?;

    if ca1.len() != ca2.len() {
        return None;
    }

    let mut n = 0.0f64;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in ca1.into_iter().zip(ca2.into_iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 {
        return None;
    }

    let std_x = (var_x / n).sqrt();
    let std_y = (var_y / n).sqrt();

    if std_x == 0.0 || std_y == 0.0 {
        return None;
    }

    let corr = cov_xy / (n * std_x * std_y);
    if corr.is_nan() {
        None
    } else {
        Some(corr)
    }
}
