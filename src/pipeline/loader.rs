//! Dataset loader for CSV and Parquet files

use anyhow::Result;
use polars::prelude::*;
use std::path::Path;

use super::error::PipelineError;

/// Basic statistics about a loaded dataset.
#[derive(Debug, Clone, Copy)]
pub struct DatasetStats {
    pub rows: usize,
    pub cols: usize,
    pub memory_mb: f64,
}

/// Load a dataset from a file (CSV or Parquet based on extension) into
/// memory. Columns are kept verbatim; only the reader's own schema
/// inference is applied.
///
/// # Arguments
/// * `path` - Input file path
/// * `infer_schema_length` - Rows used for CSV schema inference (0 = full scan)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<(DataFrame, DatasetStats)> {
    if !path.exists() {
        return Err(PipelineError::File {
            path: path.to_path_buf(),
            reason: "no such file".to_string(),
        }
        .into());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .map_err(|e| PipelineError::File {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?,
        "parquet" => {
            LazyFrame::scan_parquet(path, Default::default()).map_err(|e| PipelineError::File {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        }
        _ => {
            return Err(PipelineError::File {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported format '{}' (supported: csv, parquet)",
                    extension
                ),
            }
            .into())
        }
    };

    let df = lf.collect().map_err(|e| PipelineError::File {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);

    Ok((
        df,
        DatasetStats {
            rows,
            cols,
            memory_mb,
        },
    ))
}

/// Save a prepared dataset to file (CSV or Parquet based on extension).
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    use anyhow::Context;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
