//! Evaluation metrics for the binary classifier

use ndarray::Array1;
use serde::Serialize;

/// Precision/recall/F1 and support for one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetrics {
    pub label: i32,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Unweighted and support-weighted averages across classes.
#[derive(Debug, Clone, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-class classification report with accuracy and averages.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

/// Fraction of predictions matching the true labels.
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Build the per-class report for the binary labels {0, 1}.
pub fn classification_report(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> ClassificationReport {
    let total = y_true.len();
    let mut classes = Vec::with_capacity(2);

    for label in [0.0f64, 1.0] {
        let tp = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(&t, &p)| t == label && p == label)
            .count() as f64;
        let predicted = y_pred.iter().filter(|&&p| p == label).count() as f64;
        let support = y_true.iter().filter(|&&t| t == label).count();

        let precision = safe_div(tp, predicted);
        let recall = safe_div(tp, support as f64);
        let f1 = safe_div(2.0 * precision * recall, precision + recall);

        classes.push(ClassMetrics {
            label: label as i32,
            precision,
            recall,
            f1,
            support,
        });
    }

    let n_classes = classes.len() as f64;
    let macro_avg = AverageMetrics {
        precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
        recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
        f1: classes.iter().map(|c| c.f1).sum::<f64>() / n_classes,
    };

    let weighted = |f: fn(&ClassMetrics) -> f64| -> f64 {
        safe_div(
            classes
                .iter()
                .map(|c| f(c) * c.support as f64)
                .sum::<f64>(),
            total as f64,
        )
    };
    let weighted_avg = AverageMetrics {
        precision: weighted(|c| c.precision),
        recall: weighted(|c| c.recall),
        f1: weighted(|c| c.f1),
    };

    ClassificationReport {
        accuracy: accuracy(y_true, y_pred),
        classes,
        macro_avg,
        weighted_avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy() {
        let y_true = array![0.0, 1.0, 1.0, 0.0];
        let y_pred = array![0.0, 1.0, 0.0, 0.0];
        assert!((accuracy(&y_true, &y_pred) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_report_hand_computed() {
        // true:  0 0 0 1 1 1
        // pred:  0 0 1 1 1 0
        let y_true = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let y_pred = array![0.0, 0.0, 1.0, 1.0, 1.0, 0.0];

        let report = classification_report(&y_true, &y_pred);

        let class0 = &report.classes[0];
        assert!((class0.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((class0.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(class0.support, 3);

        let class1 = &report.classes[1];
        assert!((class1.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((class1.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((class1.f1 - 2.0 / 3.0).abs() < 1e-12);

        assert!((report.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.macro_avg.f1 - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.weighted_avg.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_division_guard() {
        // No positive predictions at all
        let y_true = array![0.0, 1.0];
        let y_pred = array![0.0, 0.0];

        let report = classification_report(&y_true, &y_pred);
        let class1 = &report.classes[1];
        assert_eq!(class1.precision, 0.0);
        assert_eq!(class1.recall, 0.0);
        assert_eq!(class1.f1, 0.0);
    }
}
