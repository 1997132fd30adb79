//! Feature-matrix assembly and stratified train/test partitioning

use anyhow::Result;
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::error::PipelineError;

/// Numeric projection of the prepared table: features, aligned targets,
/// and the column names backing each feature index.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub feature_names: Vec<String>,
    /// Cells that were gap-filled with the column median.
    pub filled_missing: usize,
}

/// Stratified train/test partition. Original row indices are carried so
/// feature/target alignment is by identity rather than position.
#[derive(Debug, Clone)]
pub struct SplitPartition {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub feature_names: Vec<String>,
}

impl SplitPartition {
    pub fn train_rows(&self) -> usize {
        self.x_train.nrows()
    }

    pub fn test_rows(&self) -> usize {
        self.x_test.nrows()
    }

    pub fn feature_count(&self) -> usize {
        self.x_train.ncols()
    }
}

/// Median of a sorted, non-empty slice (mean of middles for even length).
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Project the table onto its numeric columns (target excluded) and fill
/// remaining gaps with the per-column median computed over the full
/// matrix supplied. A column with no present values fills with 0.
pub fn build_feature_matrix(df: &DataFrame, target_column: &str) -> Result<FeatureMatrix> {
    let target = df
        .column(target_column)
        .map_err(|_| PipelineError::MissingColumn(target_column.to_string()))?
        .cast(&DataType::Float64)?;
    let target = target.f64()?;

    let mut y = Array1::<f64>::zeros(df.height());
    for (i, value) in target.into_iter().enumerate() {
        match value {
            Some(v) => y[i] = v,
            None => anyhow::bail!("target column '{}' contains null values", target_column),
        }
    }

    let feature_names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric() && col.name().as_str() != target_column)
        .map(|col| col.name().to_string())
        .collect();

    let mut x = Array2::<f64>::zeros((df.height(), feature_names.len()));
    let mut filled_missing = 0usize;

    for (j, name) in feature_names.iter().enumerate() {
        let col = df.column(name)?.cast(&DataType::Float64)?;
        let ca = col.f64()?;

        let mut present: Vec<f64> = ca.into_iter().flatten().collect();
        present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let fill = if present.is_empty() {
            0.0
        } else {
            median_of_sorted(&present)
        };

        for (i, value) in ca.into_iter().enumerate() {
            match value {
                Some(v) => x[[i, j]] = v,
                None => {
                    x[[i, j]] = fill;
                    filled_missing += 1;
                }
            }
        }
    }

    Ok(FeatureMatrix {
        x,
        y,
        feature_names,
        filled_missing,
    })
}

/// Partition rows into train/test subsets under a fixed seed, stratified
/// so each side's positive-label proportion approximates the full
/// population's. Per-class test allocation is nearest-int. Fails when a
/// target class has no examples.
pub fn stratified_split(
    features: &FeatureMatrix,
    test_ratio: f64,
    seed: u64,
) -> Result<SplitPartition> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        anyhow::bail!("test ratio must be in (0, 1), got {}", test_ratio);
    }

    let mut positive: Vec<usize> = Vec::new();
    let mut negative: Vec<usize> = Vec::new();
    for (i, &label) in features.y.iter().enumerate() {
        if label == 1.0 {
            positive.push(i);
        } else {
            negative.push(i);
        }
    }

    if positive.is_empty() {
        return Err(PipelineError::Stratification { class: 1 }.into());
    }
    if negative.is_empty() {
        return Err(PipelineError::Stratification { class: 0 }.into());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    negative.shuffle(&mut rng);
    positive.shuffle(&mut rng);

    let take_test = |class: &[usize]| -> usize { (class.len() as f64 * test_ratio).round() as usize };

    let mut test_indices: Vec<usize> = Vec::new();
    let mut train_indices: Vec<usize> = Vec::new();
    for class in [&negative, &positive] {
        let n_test = take_test(class);
        test_indices.extend_from_slice(&class[..n_test]);
        train_indices.extend_from_slice(&class[n_test..]);
    }

    // Restore original row order within each partition; selection is
    // already decided, this only stabilizes the output layout.
    test_indices.sort_unstable();
    train_indices.sort_unstable();

    let x_train = features.x.select(Axis(0), &train_indices);
    let x_test = features.x.select(Axis(0), &test_indices);
    let y_train = Array1::from_vec(train_indices.iter().map(|&i| features.y[i]).collect());
    let y_test = Array1::from_vec(test_indices.iter().map(|&i| features.y[i]).collect());

    Ok(SplitPartition {
        x_train,
        x_test,
        y_train,
        y_test,
        train_indices,
        test_indices,
        feature_names: features.feature_names.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_with_labels(labels: Vec<f64>) -> FeatureMatrix {
        let n = labels.len();
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        FeatureMatrix {
            x,
            y: Array1::from_vec(labels),
            feature_names: vec!["a".to_string(), "b".to_string()],
            filled_missing: 0,
        }
    }

    #[test]
    fn test_median_fill_uses_column_median() {
        let df = df! {
            "target" => [0i32, 1, 0, 1],
            "gappy" => [Some(1.0f64), None, Some(3.0), Some(10.0)],
        }
        .unwrap();

        let features = build_feature_matrix(&df, "target").unwrap();
        assert_eq!(features.filled_missing, 1);
        // Median of [1, 3, 10] is 3
        assert_eq!(features.x[[1, 0]], 3.0);
    }

    #[test]
    fn test_stratified_counts_match_population() {
        let mut labels = vec![0.0; 891];
        labels.extend(vec![1.0; 109]);
        let features = matrix_with_labels(labels);

        let split = stratified_split(&features, 0.2, 42).unwrap();

        assert_eq!(split.test_rows(), 200);
        assert_eq!(split.train_rows(), 800);

        let test_pos = split.y_test.iter().filter(|&&v| v == 1.0).count();
        let train_pos = split.y_train.iter().filter(|&&v| v == 1.0).count();
        assert_eq!(test_pos, 22);
        assert_eq!(train_pos, 87);
    }

    #[test]
    fn test_partitions_disjoint_and_exhaustive() {
        let labels: Vec<f64> = (0..50).map(|i| if i % 5 == 0 { 1.0 } else { 0.0 }).collect();
        let features = matrix_with_labels(labels);

        let split = stratified_split(&features, 0.2, 7).unwrap();

        let mut all: Vec<usize> = split
            .train_indices
            .iter()
            .chain(split.test_indices.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<usize>>());
    }

    #[test]
    fn test_alignment_preserved_by_identity() {
        // Feature value encodes the row index, so any misalignment between
        // a row and its label is detectable.
        let labels: Vec<f64> = (0..40).map(|i| if i < 10 { 1.0 } else { 0.0 }).collect();
        let features = matrix_with_labels(labels);

        let split = stratified_split(&features, 0.25, 3).unwrap();

        for (row, &idx) in split.test_indices.iter().enumerate() {
            assert_eq!(split.x_test[[row, 0]], (idx * 2) as f64);
            assert_eq!(split.y_test[row], if idx < 10 { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn test_same_seed_same_partition() {
        let labels: Vec<f64> = (0..100).map(|i| if i % 10 == 0 { 1.0 } else { 0.0 }).collect();
        let features = matrix_with_labels(labels);

        let a = stratified_split(&features, 0.2, 42).unwrap();
        let b = stratified_split(&features, 0.2, 42).unwrap();
        assert_eq!(a.test_indices, b.test_indices);
        assert_eq!(a.train_indices, b.train_indices);
    }

    #[test]
    fn test_single_class_fails() {
        let features = matrix_with_labels(vec![0.0; 20]);
        let err = stratified_split(&features, 0.2, 42).unwrap_err();
        let err = err.downcast_ref::<PipelineError>().unwrap();
        assert!(matches!(err, PipelineError::Stratification { class: 1 }));
    }
}
