//! Loansift: Credit-Risk Analysis CLI
//!
//! A command-line pipeline for exploratory credit-risk analysis:
//! prune sparse columns, derive a good/bad target from the terminal
//! loan status, normalize textual features, rank risk indicators by
//! correlation, and fit a random-forest baseline classifier.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use loansift::cli::{confirm_training, Cli};
use loansift::model::{classification_report, RandomForestClassifier};
use loansift::pipeline::{
    build_feature_matrix, derive_target, load_dataset, normalize_features, prune_columns,
    rank_target_correlations, save_dataset, stratified_split,
};
use loansift::report::{export_analysis, AnalysisSummary};
use loansift::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config();

    // Print styled banner and configuration card
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.input,
        &config.status_column,
        config.missing_threshold,
        config.seed,
        config.test_ratio,
        config.trees,
    );

    // Load dataset
    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let (df, stats) = load_dataset(&cli.input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", stats.rows);
    println!("      Columns: {}", stats.cols);
    println!("      Estimated memory: {:.2} MB", stats.memory_mb);

    let mut summary = AnalysisSummary::new(stats.rows, stats.cols);
    let load_elapsed = step_start.elapsed();
    summary.add_timing("Load", load_elapsed);
    print_step_time(load_elapsed);

    // Step 1: Column pruning
    print_step_header(1, "Column Pruning");

    let step_start = Instant::now();
    let (df, prune_outcome) = prune_columns(
        df,
        config.missing_threshold,
        &config.drop_columns,
        &config.status_column,
    );

    if prune_outcome.total_dropped() == 0 {
        print_info("No columns below the fill threshold or on the denylist");
    } else {
        print_count(
            "sparse column(s)",
            prune_outcome.dropped_sparse.len(),
            Some(&format!(
                "(<{:.0}% filled)",
                config.missing_threshold * 100.0
            )),
        );
        print_count(
            "identifier/free-text column(s)",
            prune_outcome.dropped_denylist.len(),
            None,
        );
        print_success("Dropped unusable columns");
    }
    println!(
        "      Columns: {} → {}",
        stats.cols,
        df.width()
    );

    summary.columns_after_prune = df.width();
    summary.dropped_sparse = prune_outcome.dropped_sparse.clone();
    summary.dropped_denylist = prune_outcome.dropped_denylist.clone();
    let prune_elapsed = step_start.elapsed();
    summary.add_timing("Prune", prune_elapsed);
    print_step_time(prune_elapsed);

    // Step 2: Label derivation
    print_step_header(2, "Label Derivation");

    let step_start = Instant::now();
    let mut df = df;
    let distribution = derive_target(&mut df, &config.status_column, &config.target_column)?;
    print_success("Derived binary target from loan status");
    summary.label_distribution = Some(distribution);
    summary.display_labels();
    let label_elapsed = step_start.elapsed();
    summary.add_timing("Label", label_elapsed);
    print_step_time(label_elapsed);

    // Step 3: Feature normalization
    print_step_header(3, "Feature Normalization");

    let step_start = Instant::now();
    let (mut df, normalize_outcome) = normalize_features(df, &config)?;
    for column in &normalize_outcome.converted {
        print_success(&format!("Converted '{}' to numeric", column));
    }
    for column in &normalize_outcome.skipped {
        print_info(&format!("Column '{}' absent after pruning, skipped", column));
    }
    let normalize_elapsed = step_start.elapsed();
    summary.add_timing("Normalize", normalize_elapsed);
    print_step_time(normalize_elapsed);

    // Step 4: Correlation ranking
    print_step_header(4, "Risk-Indicator Correlation");

    let step_start = Instant::now();
    let spinner = create_spinner("Calculating correlations against the target...");
    let correlations = rank_target_correlations(&df, &config.target_column, config.top_n)?;
    finish_with_success(&spinner, "Correlation analysis complete");

    summary.correlations = correlations;
    if summary.correlations.is_empty() {
        print_info("No numeric features with a defined correlation");
    } else {
        println!();
        summary.display_correlations();
    }
    let correlation_elapsed = step_start.elapsed();
    summary.add_timing("Correlate", correlation_elapsed);
    print_step_time(correlation_elapsed);

    // Step 5: Stratified split
    print_step_header(5, "Stratified Split");

    let step_start = Instant::now();
    let features = build_feature_matrix(&df, &config.target_column)?;
    let split = stratified_split(&features, config.test_ratio, config.seed)?;

    println!(
        "      Train rows: {}   Test rows: {}   Features: {}",
        style(split.train_rows()).yellow().bold(),
        style(split.test_rows()).yellow().bold(),
        style(split.feature_count()).yellow().bold()
    );
    if features.filled_missing > 0 {
        print_info(&format!(
            "{} missing cell(s) filled with column medians",
            features.filled_missing
        ));
    }

    summary.train_rows = split.train_rows();
    summary.test_rows = split.test_rows();
    summary.feature_count = split.feature_count();
    summary.filled_missing = features.filled_missing;
    let split_elapsed = step_start.elapsed();
    summary.add_timing("Split", split_elapsed);
    print_step_time(split_elapsed);

    // Confirm before the only slow stage
    if !cli.no_confirm && !confirm_training(config.trees, split.train_rows())? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Step 6: Random-forest baseline
    print_step_header(6, "Random-Forest Baseline");

    let step_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Fitting {} trees (max depth {})...",
        config.trees, config.max_depth
    ));
    let mut forest = RandomForestClassifier::new(config.trees)
        .with_max_depth(config.max_depth)
        .with_seed(config.seed)
        .with_balanced_class_weights(true);
    forest.fit(&split.x_train, &split.y_train)?;
    let predictions = forest.predict(&split.x_test)?;
    finish_with_success(&spinner, "Model fitted and evaluated");
    println!();

    summary.evaluation = Some(classification_report(&split.y_test, &predictions));
    summary.display_evaluation();

    if let Some(importances) = forest.feature_importances() {
        let mut ranked: Vec<(String, f64)> = split
            .feature_names
            .iter()
            .cloned()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(config.top_n);
        summary.importances = ranked;

        println!();
        println!(
            "      {}",
            style("Most influential features:").white().bold()
        );
        summary.display_importances();
    }
    let train_elapsed = step_start.elapsed();
    summary.add_timing("Train + evaluate", train_elapsed);
    print_step_time(train_elapsed);

    // Step 7: Save results
    print_step_header(7, "Save Results");

    let step_start = Instant::now();
    if let Some(output) = &cli.output {
        let spinner = create_spinner("Writing prepared feature table...");
        save_dataset(&mut df, output)?;
        finish_with_success(&spinner, &format!("Saved to {}", output.display()));
    }

    let report_path = cli.report_path();
    export_analysis(
        &summary,
        &config,
        &cli.input.display().to_string(),
        &report_path,
    )?;
    print_success(&format!("Report written to {}", report_path.display()));
    summary.add_timing("Save", step_start.elapsed());

    // Display summary
    summary.display();

    // Final completion message
    print_completion();

    Ok(())
}
