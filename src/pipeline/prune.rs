//! Column pruning: sparse columns and identifier denylist

use anyhow::Result;
use polars::prelude::*;

/// Outcome of the pruning stage.
#[derive(Debug, Clone, Default)]
pub struct PruneOutcome {
    /// Columns dropped because too few values were present.
    pub dropped_sparse: Vec<String>,
    /// Denylist columns that were present and dropped.
    pub dropped_denylist: Vec<String>,
}

impl PruneOutcome {
    pub fn total_dropped(&self) -> usize {
        self.dropped_sparse.len() + self.dropped_denylist.len()
    }
}

/// Present-value fraction per column, sorted ascending (sparsest first).
pub fn analyze_fill_rates(df: &DataFrame) -> Vec<(String, f64)> {
    if df.height() == 0 {
        return Vec::new();
    }

    let rows = df.height() as f64;
    let mut fill_rates: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|col| {
            let present = (col.len() - col.null_count()) as f64;
            (col.name().to_string(), present / rows)
        })
        .collect();

    fill_rates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    fill_rates
}

/// Columns whose present-value count falls below `threshold * rows`.
///
/// A column is kept when `present >= threshold * rows`, so a column at
/// exactly the threshold survives. The protected column is never selected.
pub fn columns_below_threshold(
    fill_rates: &[(String, f64)],
    threshold: f64,
    protected: &str,
) -> Vec<String> {
    fill_rates
        .iter()
        .filter(|(name, fill)| *fill < threshold && name != protected)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Drop sparse columns, then the identifier denylist. Denylist names not
/// present in the dataset are ignored; the protected column survives both
/// passes. Pure function of (table, threshold, denylist) and idempotent.
pub fn prune_columns(
    df: DataFrame,
    threshold: f64,
    denylist: &[String],
    protected: &str,
) -> (DataFrame, PruneOutcome) {
    let fill_rates = analyze_fill_rates(&df);
    let dropped_sparse = columns_below_threshold(&fill_rates, threshold, protected);
    let df = df.drop_many(&dropped_sparse);

    let column_names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    let dropped_denylist: Vec<String> = denylist
        .iter()
        .filter(|name| column_names.contains(*name) && name.as_str() != protected)
        .cloned()
        .collect();
    let df = df.drop_many(&dropped_denylist);

    (
        df,
        PruneOutcome {
            dropped_sparse,
            dropped_denylist,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rates_sorted_ascending() {
        let df = df! {
            "full" => [Some(1.0f64), Some(2.0), Some(3.0), Some(4.0)],
            "half" => [Some(1.0f64), Some(2.0), None, None],
            "empty" => [None::<f64>, None, None, None],
        }
        .unwrap();

        let rates = analyze_fill_rates(&df);
        assert_eq!(rates[0].0, "empty");
        assert_eq!(rates[2].0, "full");
        assert!((rates[1].1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_protected_column_never_selected() {
        let rates = vec![
            ("loan_status".to_string(), 0.1),
            ("junk".to_string(), 0.1),
        ];
        let drops = columns_below_threshold(&rates, 0.5, "loan_status");
        assert_eq!(drops, vec!["junk".to_string()]);
    }

    #[test]
    fn test_denylist_ignores_absent_names() {
        let df = df! {
            "id" => [1i64, 2, 3],
            "amount" => [100.0f64, 200.0, 300.0],
        }
        .unwrap();

        let denylist = vec!["id".to_string(), "url".to_string()];
        let (pruned, outcome) = prune_columns(df, 0.5, &denylist, "loan_status");

        assert_eq!(outcome.dropped_denylist, vec!["id".to_string()]);
        assert!(pruned.column("amount").is_ok());
        assert!(pruned.column("id").is_err());
    }
}
