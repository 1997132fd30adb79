//! Unit tests for column pruning

use loansift::pipeline::{analyze_fill_rates, columns_below_threshold, prune_columns};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

/// Column with `filled` present values out of 100 rows.
fn column_with_fill(name: &str, filled: usize) -> Column {
    let values: Vec<Option<f64>> = (0..100)
        .map(|i| if i < filled { Some(i as f64) } else { None })
        .collect();
    Column::new(name.into(), values)
}

fn boundary_dataframe() -> DataFrame {
    DataFrame::new(vec![
        column_with_fill("fill_49", 49),
        column_with_fill("fill_50", 50),
        column_with_fill("fill_51", 51),
        column_with_fill("fill_100", 100),
    ])
    .unwrap()
}

#[test]
fn test_threshold_boundary_drop_keep_keep() {
    let df = boundary_dataframe();
    let (pruned, outcome) = prune_columns(df, 0.5, &[], "loan_status");

    assert_eq!(outcome.dropped_sparse, vec!["fill_49".to_string()]);
    common::assert_missing_columns(&pruned, &["fill_49"]);
    common::assert_has_columns(&pruned, &["fill_50", "fill_51", "fill_100"]);
}

#[test]
fn test_fill_rate_values() {
    let df = boundary_dataframe();
    let rates = analyze_fill_rates(&df);
    let rate_map: std::collections::HashMap<_, _> = rates.into_iter().collect();

    assert!((rate_map["fill_49"] - 0.49).abs() < 1e-12);
    assert!((rate_map["fill_50"] - 0.50).abs() < 1e-12);
    assert!((rate_map["fill_100"] - 1.0).abs() < 1e-12);
}

#[test]
fn test_status_column_protected_from_sparse_drop() {
    let rates = vec![
        ("loan_status".to_string(), 0.1),
        ("junk".to_string(), 0.2),
    ];
    let drops = columns_below_threshold(&rates, 0.5, "loan_status");
    assert_eq!(drops, vec!["junk".to_string()]);
}

#[test]
fn test_denylist_drops_present_names_only() {
    let df = common::create_loan_dataframe();
    let denylist = vec![
        "id".to_string(),
        "url".to_string(),
        "zip_code".to_string(),
    ];

    let (pruned, outcome) = prune_columns(df, 0.5, &denylist, "loan_status");

    assert_eq!(outcome.dropped_denylist, vec!["id".to_string()]);
    common::assert_missing_columns(&pruned, &["id"]);
    common::assert_has_columns(&pruned, &["loan_status", "term"]);
}

#[test]
fn test_prune_is_idempotent() {
    let df = common::create_loan_dataframe();
    let denylist = vec!["id".to_string()];

    let (once, first) = prune_columns(df, 0.5, &denylist, "loan_status");
    assert!(first.total_dropped() > 0);

    let columns_once: Vec<String> = once.get_column_names().iter().map(|s| s.to_string()).collect();
    let (twice, second) = prune_columns(once, 0.5, &denylist, "loan_status");
    let columns_twice: Vec<String> =
        twice.get_column_names().iter().map(|s| s.to_string()).collect();

    assert_eq!(second.total_dropped(), 0, "Second pass should be a no-op");
    assert_eq!(columns_once, columns_twice);
}

#[test]
fn test_row_count_unchanged() {
    let df = common::create_loan_dataframe();
    let rows = df.height();
    let (pruned, _) = prune_columns(df, 0.5, &["id".to_string()], "loan_status");
    assert_eq!(pruned.height(), rows);
}
