//! Classifier capability and the train/test split it is scored on

use crate::{ModelingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An estimator that can be fitted once and then asked for labels
pub trait Classifier {
    /// Train on `features` (one row per sample) and their labels
    fn fit(&mut self, features: &[Vec<f64>], labels: &[i64]) -> Result<()>;

    /// Predict one label per row of `features`
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<i64>>;
}

/// A classifier together with the name it is reported under
pub type NamedModel = (String, Box<dyn Classifier>);

/// Pair a classifier with its report name
pub fn named_model<M: Classifier + 'static>(name: impl Into<String>, model: M) -> NamedModel {
    let model: Box<dyn Classifier> = Box::new(model);
    (name.into(), model)
}

/// Fixed train/test split shared by every model in a comparison
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Vec<Vec<f64>>,
    pub y_train: Vec<i64>,
    pub x_test: Vec<Vec<f64>>,
    pub y_test: Vec<i64>,
}

impl TrainTestSplit {
    pub fn new(
        x_train: Vec<Vec<f64>>,
        y_train: Vec<i64>,
        x_test: Vec<Vec<f64>>,
        y_test: Vec<i64>,
    ) -> Self {
        Self {
            x_train,
            y_train,
            x_test,
            y_test,
        }
    }

    /// Load a split stored as JSON with `x_train`, `y_train`, `x_test`, `y_test`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let split: Self = serde_json::from_str(&content)?;
        split.validate()?;
        Ok(split)
    }

    /// Features and labels must line up row for row
    pub fn validate(&self) -> Result<()> {
        if self.x_train.len() != self.y_train.len() {
            return Err(ModelingError::LengthMismatch {
                what: "x_train".to_string(),
                left: self.x_train.len(),
                right: self.y_train.len(),
            });
        }
        if self.x_test.len() != self.y_test.len() {
            return Err(ModelingError::LengthMismatch {
                what: "x_test".to_string(),
                left: self.x_test.len(),
                right: self.y_test.len(),
            });
        }
        Ok(())
    }
}

/// Check that every row has the same, non-zero width of finite values
pub(crate) fn feature_width(features: &[Vec<f64>]) -> Result<usize> {
    let width = match features.first() {
        Some(row) if !row.is_empty() => row.len(),
        Some(_) => return Err(ModelingError::InvalidInput("feature rows are empty".to_string())),
        None => return Err(ModelingError::InvalidInput("no samples".to_string())),
    };

    for (i, row) in features.iter().enumerate() {
        if row.len() != width {
            return Err(ModelingError::InvalidInput(format!(
                "row {} has {} features, expected {}",
                i,
                row.len(),
                width
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ModelingError::InvalidInput(format!(
                "row {} contains a non-finite value",
                i
            )));
        }
    }

    Ok(width)
}
