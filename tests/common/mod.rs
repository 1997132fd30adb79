//! Shared test utilities and fixture generators

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small loan-table DataFrame with every column the pipeline
/// expects, fully populated and valid.
///
/// Statuses: rows 0 and 5 are "Charged Off" (bad), the rest good.
pub fn create_loan_dataframe() -> DataFrame {
    df! {
        "id" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "loan_status" => [
            "Charged Off", "Fully Paid", "Current", "Fully Paid", "Current",
            "Charged Off", "Fully Paid", "Current", "Fully Paid", "Current",
        ],
        "term" => [
            " 36 months", " 60 months", " 36 months", " 36 months", " 60 months",
            " 36 months", " 36 months", " 60 months", " 36 months", " 36 months",
        ],
        "emp_length" => [
            Some("10+ years"), Some("< 1 year"), Some("3 years"), None, Some("7 years"),
            Some("1 year"), Some("5 years"), Some("2 years"), None, Some("9 years"),
        ],
        "grade" => ["A", "B", "C", "D", "E", "F", "G", "A", "B", "C"],
        "issue_d" => [
            "Jun-15", "Jan-14", "Dec-13", "Mar-15", "Jul-14",
            "Aug-13", "Sep-15", "Oct-14", "Nov-13", "Feb-15",
        ],
        "loan_amnt" => [1000.0f64, 2000.0, 1500.0, 3000.0, 2500.0, 1200.0, 1800.0, 2200.0, 2700.0, 1600.0],
        "int_rate" => [18.0f64, 7.0, 10.0, 8.0, 11.0, 19.5, 7.5, 9.0, 8.5, 10.5],
        "mostly_empty" => [Some(1.0f64), None, None, None, None, None, None, None, None, Some(2.0)],
    }
    .unwrap()
}

/// Synthetic 100-row loan table with a known status distribution:
/// 20 bad loans ("Charged Off"), 80 good ("Fully Paid").
///
/// `int_rate` separates the classes, so a classifier can learn the
/// boundary; `loan_amnt` is a repeating pattern with no signal.
pub fn create_synthetic_loan_dataframe() -> DataFrame {
    let n = 100usize;
    let statuses: Vec<&str> = (0..n)
        .map(|i| if i % 5 == 0 { "Charged Off" } else { "Fully Paid" })
        .collect();

    let terms: Vec<&str> = (0..n)
        .map(|i| if i % 2 == 0 { " 36 months" } else { " 60 months" })
        .collect();
    let tenures: Vec<&str> = (0..n)
        .map(|i| match i % 4 {
            0 => "10+ years",
            1 => "< 1 year",
            2 => "3 years",
            _ => "6 years",
        })
        .collect();
    let grades: Vec<&str> = (0..n)
        .map(|i| ["A", "B", "C", "D", "E", "F", "G"][i % 7])
        .collect();
    let issue_dates: Vec<&str> = (0..n)
        .map(|i| ["Jun-15", "Jan-14", "Dec-13", "Mar-15", "Jul-14"][i % 5])
        .collect();
    let amounts: Vec<f64> = (0..n).map(|i| 1000.0 + (i % 10) as f64 * 250.0).collect();
    // Bad loans (every fifth row) carry visibly higher rates.
    let rates: Vec<f64> = (0..n)
        .map(|i| {
            if i % 5 == 0 {
                18.0 + (i % 3) as f64
            } else {
                7.0 + (i % 4) as f64
            }
        })
        .collect();

    df! {
        "loan_status" => statuses,
        "term" => terms,
        "emp_length" => tenures,
        "grade" => grades,
        "issue_d" => issue_dates,
        "loan_amnt" => amounts,
        "int_rate" => rates,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_loans.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_loans.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
