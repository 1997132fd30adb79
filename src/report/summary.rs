//! Console summary of an analysis run

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::model::ClassificationReport;
use crate::pipeline::{LabelDistribution, TargetCorrelation};

/// Accumulated outcomes of the pipeline stages, rendered at the end of
/// a run.
#[derive(Debug, Default)]
pub struct AnalysisSummary {
    pub initial_columns: usize,
    pub columns_after_prune: usize,
    pub dropped_sparse: Vec<String>,
    pub dropped_denylist: Vec<String>,
    pub rows: usize,
    pub label_distribution: Option<LabelDistribution>,
    pub correlations: Vec<TargetCorrelation>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_count: usize,
    pub filled_missing: usize,
    pub evaluation: Option<ClassificationReport>,
    pub importances: Vec<(String, f64)>,
    timings: Vec<(String, Duration)>,
}

impl AnalysisSummary {
    pub fn new(rows: usize, initial_columns: usize) -> Self {
        Self {
            rows,
            initial_columns,
            columns_after_prune: initial_columns,
            ..Default::default()
        }
    }

    pub fn add_timing(&mut self, stage: &str, elapsed: Duration) {
        self.timings.push((stage.to_string(), elapsed));
    }

    fn section(title: &str) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style(title).white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();
    }

    fn print_table(table: &Table) {
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }

    fn new_table(headers: Vec<&str>) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(
            headers
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        table
    }

    /// Render the label distribution table.
    pub fn display_labels(&self) {
        let Some(dist) = &self.label_distribution else {
            return;
        };

        let mut table = Self::new_table(vec!["Class", "Count", "Share"]);
        table.add_row(vec![
            Cell::new("0 (good loan)"),
            Cell::new(dist.good),
            Cell::new(format!("{:.1}%", (1.0 - dist.bad_fraction()) * 100.0)),
        ]);
        table.add_row(vec![
            Cell::new("1 (bad loan)").fg(Color::Red),
            Cell::new(dist.bad).fg(Color::Red),
            Cell::new(format!("{:.1}%", dist.bad_fraction() * 100.0)).fg(Color::Red),
        ]);
        Self::print_table(&table);
    }

    /// Render the ranked correlation table.
    pub fn display_correlations(&self) {
        if self.correlations.is_empty() {
            return;
        }

        let mut table = Self::new_table(vec!["#", "Indicator", "Correlation"]);
        for (rank, corr) in self.correlations.iter().enumerate() {
            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(&corr.feature),
                Cell::new(format!("{:+.4}", corr.correlation)).fg(if corr.correlation >= 0.0 {
                    Color::Yellow
                } else {
                    Color::Cyan
                }),
            ]);
        }
        Self::print_table(&table);
    }

    /// Render accuracy plus the per-class classification report.
    pub fn display_evaluation(&self) {
        let Some(report) = &self.evaluation else {
            return;
        };

        println!(
            "      Accuracy: {}",
            style(format!("{:.2}%", report.accuracy * 100.0)).green().bold()
        );
        println!();

        let mut table = Self::new_table(vec!["Class", "Precision", "Recall", "F1", "Support"]);
        for class in &report.classes {
            table.add_row(vec![
                Cell::new(class.label),
                Cell::new(format!("{:.3}", class.precision)),
                Cell::new(format!("{:.3}", class.recall)),
                Cell::new(format!("{:.3}", class.f1)),
                Cell::new(class.support),
            ]);
        }
        table.add_row(vec![
            Cell::new("macro avg").add_attribute(Attribute::Italic),
            Cell::new(format!("{:.3}", report.macro_avg.precision)),
            Cell::new(format!("{:.3}", report.macro_avg.recall)),
            Cell::new(format!("{:.3}", report.macro_avg.f1)),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("weighted avg").add_attribute(Attribute::Italic),
            Cell::new(format!("{:.3}", report.weighted_avg.precision)),
            Cell::new(format!("{:.3}", report.weighted_avg.recall)),
            Cell::new(format!("{:.3}", report.weighted_avg.f1)),
            Cell::new(""),
        ]);
        Self::print_table(&table);
    }

    /// Render the ranked feature-importance table.
    pub fn display_importances(&self) {
        if self.importances.is_empty() {
            return;
        }

        let mut table = Self::new_table(vec!["#", "Feature", "Importance"]);
        for (rank, (feature, importance)) in self.importances.iter().enumerate() {
            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(feature),
                Cell::new(format!("{:.4}", importance)).fg(Color::Green),
            ]);
        }
        Self::print_table(&table);
    }

    /// Final run summary: shape changes and per-stage timings.
    pub fn display(&self) {
        Self::section("RUN SUMMARY");

        let mut table = Self::new_table(vec!["Metric", "Value"]);
        table.add_row(vec![Cell::new("Rows"), Cell::new(self.rows)]);
        table.add_row(vec![
            Cell::new("Initial columns"),
            Cell::new(self.initial_columns),
        ]);
        table.add_row(vec![
            Cell::new("Columns after pruning"),
            Cell::new(self.columns_after_prune).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("Dropped (sparse)"),
            Cell::new(self.dropped_sparse.len()).fg(if self.dropped_sparse.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("Dropped (identifier)"),
            Cell::new(self.dropped_denylist.len()).fg(if self.dropped_denylist.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        if let Some(dist) = &self.label_distribution {
            table.add_row(vec![
                Cell::new("Bad-loan share"),
                Cell::new(format!("{:.1}%", dist.bad_fraction() * 100.0)).fg(Color::Yellow),
            ]);
        }
        if self.train_rows > 0 {
            table.add_row(vec![
                Cell::new("Train / test rows"),
                Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
            ]);
            table.add_row(vec![
                Cell::new("Model features"),
                Cell::new(self.feature_count),
            ]);
            table.add_row(vec![
                Cell::new("Median-filled cells"),
                Cell::new(self.filled_missing),
            ]);
        }
        if let Some(report) = &self.evaluation {
            table.add_row(vec![
                Cell::new("Accuracy"),
                Cell::new(format!("{:.2}%", report.accuracy * 100.0))
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
        }
        Self::print_table(&table);

        if !self.timings.is_empty() {
            println!();
            let mut table = Self::new_table(vec!["Stage", "Time"]);
            for (stage, elapsed) in &self.timings {
                table.add_row(vec![
                    Cell::new(stage),
                    Cell::new(format!("{:.2}s", elapsed.as_secs_f64())),
                ]);
            }
            Self::print_table(&table);
        }
    }
}
