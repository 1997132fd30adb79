//! Unit tests for the dataset loader

use loansift::pipeline::{load_dataset, save_dataset, PipelineError};
use std::path::Path;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_roundtrip() {
    let mut df = common::create_loan_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df);

    let (loaded, stats) = load_dataset(&csv_path, 100).unwrap();

    assert_eq!(stats.rows, 10);
    assert_eq!(stats.cols, 9);
    assert_eq!(loaded.shape(), (10, 9));
    common::assert_has_columns(&loaded, &["loan_status", "term", "grade", "issue_d"]);
}

#[test]
fn test_load_parquet_roundtrip() {
    let mut df = common::create_loan_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let (loaded, stats) = load_dataset(&parquet_path, 100).unwrap();
    assert_eq!(stats.rows, 10);
    assert_eq!(loaded.shape(), df.shape());
}

#[test]
fn test_missing_file_is_file_error() {
    let err = load_dataset(Path::new("/nonexistent/loans.csv"), 100).unwrap_err();
    let err = err.downcast_ref::<PipelineError>().unwrap();
    assert!(matches!(err, PipelineError::File { .. }));
}

#[test]
fn test_unsupported_extension_is_file_error() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("loans.xlsx");
    std::fs::write(&path, b"not a table").unwrap();

    let err = load_dataset(&path, 100).unwrap_err();
    let err = err.downcast_ref::<PipelineError>().unwrap();
    assert!(matches!(err, PipelineError::File { .. }));
}

#[test]
fn test_save_then_reload_csv() {
    let mut df = common::create_loan_dataframe();
    let temp_dir = tempfile::TempDir::new().unwrap();
    let out_path = temp_dir.path().join("prepared.csv");

    save_dataset(&mut df, &out_path).unwrap();
    let (reloaded, _) = load_dataset(&out_path, 100).unwrap();
    assert_eq!(reloaded.shape(), df.shape());
}
