//! JSON export of the analysis results
//!
//! The console output is for reading; this export is the structured
//! record of the same results (configuration echo, label distribution,
//! correlation ranking, split shape, evaluation, importances).

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::model::ClassificationReport;
use crate::pipeline::{LabelDistribution, TargetCorrelation};
use crate::report::AnalysisSummary;

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// Loansift version
    pub loansift_version: String,
    /// Input file path
    pub input_file: String,
    /// Effective run configuration
    pub settings: ExportSettings,
}

/// The configuration values the run actually used
#[derive(Serialize)]
pub struct ExportSettings {
    pub status_column: String,
    pub target_column: String,
    pub missing_threshold: f64,
    pub reference_date: String,
    pub seed: u64,
    pub test_ratio: f64,
    pub trees: usize,
    pub max_depth: usize,
    pub top_n: usize,
}

/// Column-shape changes through pruning
#[derive(Serialize)]
pub struct ColumnSummary {
    pub initial: usize,
    pub after_prune: usize,
    pub dropped_sparse: Vec<String>,
    pub dropped_denylist: Vec<String>,
}

/// Train/test partition shape
#[derive(Serialize)]
pub struct SplitShape {
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: usize,
    pub median_filled_cells: usize,
}

/// A single ranked feature importance
#[derive(Serialize)]
pub struct ImportanceEntry {
    pub feature: String,
    pub importance: f64,
}

/// Complete analysis export
#[derive(Serialize)]
pub struct AnalysisExport {
    pub metadata: ExportMetadata,
    pub columns: ColumnSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_distribution: Option<LabelDistribution>,
    pub top_correlations: Vec<TargetCorrelation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<ClassificationReport>,
    pub feature_importances: Vec<ImportanceEntry>,
}

/// Write the analysis results as pretty-printed JSON.
pub fn export_analysis(
    summary: &AnalysisSummary,
    config: &AnalysisConfig,
    input_file: &str,
    output_path: &Path,
) -> Result<()> {
    let split = if summary.train_rows > 0 {
        Some(SplitShape {
            train_rows: summary.train_rows,
            test_rows: summary.test_rows,
            features: summary.feature_count,
            median_filled_cells: summary.filled_missing,
        })
    } else {
        None
    };

    let export = AnalysisExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            loansift_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            settings: ExportSettings {
                status_column: config.status_column.clone(),
                target_column: config.target_column.clone(),
                missing_threshold: config.missing_threshold,
                reference_date: config.reference_date.to_string(),
                seed: config.seed,
                test_ratio: config.test_ratio,
                trees: config.trees,
                max_depth: config.max_depth,
                top_n: config.top_n,
            },
        },
        columns: ColumnSummary {
            initial: summary.initial_columns,
            after_prune: summary.columns_after_prune,
            dropped_sparse: summary.dropped_sparse.clone(),
            dropped_denylist: summary.dropped_denylist.clone(),
        },
        label_distribution: summary.label_distribution,
        top_correlations: summary.correlations.clone(),
        split,
        evaluation: summary.evaluation.clone(),
        feature_importances: summary
            .importances
            .iter()
            .map(|(feature, importance)| ImportanceEntry {
                feature: feature.clone(),
                importance: *importance,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize analysis results to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis report to {}", output_path.display()))?;

    Ok(())
}
