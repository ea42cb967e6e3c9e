//! Classification metrics
//!
//! Binary scores treat `POSITIVE_LABEL` as the positive class. A score whose
//! denominator is zero evaluates to 0.0 and logs a warning.

use crate::{ModelingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Label treated as the positive class by the binary scores
pub const POSITIVE_LABEL: i64 = 1;

/// Square confusion matrix over the sorted union of observed labels.
///
/// Rows are true labels, columns are predicted labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<i64>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Build from ground truth and predictions
    pub fn from_predictions(y_true: &[i64], y_pred: &[i64]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;

        let labels: Vec<i64> = y_true
            .iter()
            .chain(y_pred.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (truth, pred) in y_true.iter().zip(y_pred.iter()) {
            // Both labels come from `labels`, so the lookups always succeed
            if let (Ok(row), Ok(col)) = (labels.binary_search(truth), labels.binary_search(pred)) {
                counts[row][col] += 1;
            }
        }

        Ok(Self { labels, counts })
    }

    /// Number of distinct labels (rows and columns)
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Count of samples with true label `truth` predicted as `pred`
    pub fn count(&self, truth: i64, pred: i64) -> usize {
        match (self.labels.binary_search(&truth), self.labels.binary_search(&pred)) {
            (Ok(row), Ok(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    /// Total number of samples
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Fraction of exact matches
pub fn accuracy_score(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// TP / (TP + FP)
pub fn precision_score(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    let counts = BinaryCounts::new(y_true, y_pred)?;
    Ok(ratio(counts.tp, counts.tp + counts.fp, "precision"))
}

/// TP / (TP + FN)
pub fn recall_score(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    let counts = BinaryCounts::new(y_true, y_pred)?;
    Ok(ratio(counts.tp, counts.tp + counts.fn_, "recall"))
}

/// Harmonic mean of precision and recall, 2TP / (2TP + FP + FN)
pub fn f1_score(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    let counts = BinaryCounts::new(y_true, y_pred)?;
    Ok(ratio(2 * counts.tp, 2 * counts.tp + counts.fp + counts.fn_, "f1"))
}

#[derive(Debug, Clone, Copy, Default)]
struct BinaryCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

impl BinaryCounts {
    fn new(y_true: &[i64], y_pred: &[i64]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;
        check_binary(y_true, y_pred)?;

        let mut counts = Self::default();
        for (&truth, &pred) in y_true.iter().zip(y_pred) {
            match (truth == POSITIVE_LABEL, pred == POSITIVE_LABEL) {
                (true, true) => counts.tp += 1,
                (false, true) => counts.fp += 1,
                (true, false) => counts.fn_ += 1,
                (false, false) => {}
            }
        }
        Ok(counts)
    }
}

fn check_lengths(y_true: &[i64], y_pred: &[i64]) -> Result<()> {
    if y_true.is_empty() {
        return Err(ModelingError::InvalidInput("no labels to score".to_string()));
    }
    if y_true.len() != y_pred.len() {
        return Err(ModelingError::LengthMismatch {
            what: "predictions".to_string(),
            left: y_pred.len(),
            right: y_true.len(),
        });
    }
    Ok(())
}

fn check_binary(y_true: &[i64], y_pred: &[i64]) -> Result<()> {
    let labels: BTreeSet<i64> = y_true.iter().chain(y_pred).copied().collect();
    if labels.len() > 2 {
        return Err(ModelingError::NonBinaryTarget(format!(
            "found {} distinct labels {:?}",
            labels.len(),
            labels
        )));
    }
    if labels.len() == 2 && !labels.contains(&POSITIVE_LABEL) {
        return Err(ModelingError::NonBinaryTarget(format!(
            "positive label {} not among {:?}",
            POSITIVE_LABEL, labels
        )));
    }
    Ok(())
}

fn ratio(numerator: usize, denominator: usize, metric: &str) -> f64 {
    if denominator == 0 {
        warn!("{} is ill-defined (zero denominator), reporting 0.0", metric);
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
