//! Baseline classifiers
//!
//! - Majority class (always predict the most common training label)
//! - Nearest centroid (closest per-class mean, Euclidean)
//! - Threshold (best single-feature decision stump)

use crate::classifier::{feature_width, Classifier};
use crate::{ModelingError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Names accepted by `baseline_by_name`
pub const BASELINE_NAMES: [&str; 3] = ["majority", "nearest-centroid", "threshold"];

/// Construct an unfitted baseline by name
pub fn baseline_by_name(name: &str) -> Option<Box<dyn Classifier>> {
    match name {
        "majority" => Some(Box::new(MajorityClassifier::new())),
        "nearest-centroid" => Some(Box::new(NearestCentroidClassifier::new())),
        "threshold" => Some(Box::new(ThresholdClassifier::new())),
        _ => None,
    }
}

fn check_training_set(features: &[Vec<f64>], labels: &[i64]) -> Result<usize> {
    if features.len() != labels.len() {
        return Err(ModelingError::LengthMismatch {
            what: "features".to_string(),
            left: features.len(),
            right: labels.len(),
        });
    }
    feature_width(features)
}

/// Always predicts the most frequent training label (ties go to the smaller label)
#[derive(Debug, Clone, Default)]
pub struct MajorityClassifier {
    label: Option<i64>,
}

impl MajorityClassifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for MajorityClassifier {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[i64]) -> Result<()> {
        check_training_set(features, labels)?;

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for &label in labels {
            *counts.entry(label).or_default() += 1;
        }

        let mut best: Option<(i64, usize)> = None;
        for (label, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((label, count));
            }
        }

        self.label = best.map(|(label, _)| label);
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i64>> {
        let label = self.label.ok_or(ModelingError::NotFitted)?;
        Ok(vec![label; features.len()])
    }
}

/// Assigns each sample the label of the closest class mean
#[derive(Debug, Clone, Default)]
pub struct NearestCentroidClassifier {
    centroids: BTreeMap<i64, Vec<f64>>,
    width: usize,
}

impl NearestCentroidClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class means, keyed by label
    pub fn centroids(&self) -> &BTreeMap<i64, Vec<f64>> {
        &self.centroids
    }
}

impl Classifier for NearestCentroidClassifier {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[i64]) -> Result<()> {
        let width = check_training_set(features, labels)?;

        let mut sums: BTreeMap<i64, (Vec<f64>, usize)> = BTreeMap::new();
        for (row, &label) in features.iter().zip(labels) {
            let (sum, count) = sums.entry(label).or_insert_with(|| (vec![0.0; width], 0));
            for (acc, value) in sum.iter_mut().zip(row) {
                *acc += value;
            }
            *count += 1;
        }

        self.centroids = sums
            .into_iter()
            .map(|(label, (sum, count))| {
                let mean = sum.into_iter().map(|v| v / count as f64).collect();
                (label, mean)
            })
            .collect();
        self.width = width;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i64>> {
        if self.centroids.is_empty() {
            return Err(ModelingError::NotFitted);
        }
        if features.is_empty() {
            return Ok(Vec::new());
        }
        let width = feature_width(features)?;
        if width != self.width {
            return Err(ModelingError::InvalidInput(format!(
                "expected {} features, got {}",
                self.width, width
            )));
        }

        let predictions = features
            .iter()
            .map(|row| {
                let mut best: Option<(i64, f64)> = None;
                for (&label, centroid) in &self.centroids {
                    let distance: f64 = row
                        .iter()
                        .zip(centroid)
                        .map(|(x, c)| (x - c) * (x - c))
                        .sum();
                    if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                        best = Some((label, distance));
                    }
                }
                // centroids is non-empty, so best is always set
                best.map_or(0, |(label, _)| label)
            })
            .collect();

        Ok(predictions)
    }
}

/// Fitted decision stump: `x[feature] > threshold` maps to `above`, otherwise `below`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stump {
    pub feature: usize,
    pub threshold: f64,
    pub above: i64,
    pub below: i64,
}

/// Single-feature decision stump chosen by training accuracy
#[derive(Debug, Clone, Default)]
pub struct ThresholdClassifier {
    stump: Option<Stump>,
    width: usize,
}

impl ThresholdClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stump(&self) -> Option<Stump> {
        self.stump
    }
}

impl Classifier for ThresholdClassifier {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[i64]) -> Result<()> {
        let width = check_training_set(features, labels)?;

        let classes: Vec<i64> = labels.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let (low, high) = match classes.as_slice() {
            [only] => (*only, *only),
            [low, high] => (*low, *high),
            _ => {
                return Err(ModelingError::NonBinaryTarget(format!(
                    "threshold classifier needs at most 2 classes, found {}",
                    classes.len()
                )))
            }
        };

        let mut best: Option<(Stump, usize)> = None;
        for feature in 0..width {
            let mut values: Vec<f64> = features.iter().map(|row| row[feature]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();

            // Below every value, then midway between neighbours
            let mut thresholds = vec![values[0] - 1.0];
            thresholds.extend(values.windows(2).map(|pair| (pair[0] + pair[1]) / 2.0));

            for &threshold in &thresholds {
                for (above, below) in [(high, low), (low, high)] {
                    let stump = Stump {
                        feature,
                        threshold,
                        above,
                        below,
                    };
                    let correct = features
                        .iter()
                        .zip(labels)
                        .filter(|(row, label)| apply(&stump, row) == **label)
                        .count();
                    if best.map_or(true, |(_, best_correct)| correct > best_correct) {
                        best = Some((stump, correct));
                    }
                }
            }
        }

        self.stump = best.map(|(stump, _)| stump);
        self.width = width;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i64>> {
        let stump = self.stump.ok_or(ModelingError::NotFitted)?;
        if features.is_empty() {
            return Ok(Vec::new());
        }
        let width = feature_width(features)?;
        if width != self.width {
            return Err(ModelingError::InvalidInput(format!(
                "expected {} features, got {}",
                self.width, width
            )));
        }
        Ok(features.iter().map(|row| apply(&stump, row)).collect())
    }
}

fn apply(stump: &Stump, row: &[f64]) -> i64 {
    if row[stump.feature] > stump.threshold {
        stump.above
    } else {
        stump.below
    }
}
