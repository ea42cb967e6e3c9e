//! Fit/predict/score loop over a set of named classifiers

use crate::classifier::{Classifier, NamedModel, TrainTestSplit};
use crate::clock::Clock;
use crate::metrics::{accuracy_score, f1_score, precision_score, recall_score, ConfusionMatrix};
use crate::{ModelingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Scores and timing for one model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelEvaluation {
    pub model_name: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion_matrix: ConfusionMatrix,

    /// Elapsed time of fit + predict combined, as read from the injected clock
    pub elapsed_seconds: f64,
}

/// Per-model result of `compare_isolated`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Evaluated(ModelEvaluation),
    Failed { model_name: String, reason: String },
}

impl ModelOutcome {
    pub fn model_name(&self) -> &str {
        match self {
            ModelOutcome::Evaluated(evaluation) => &evaluation.model_name,
            ModelOutcome::Failed { model_name, .. } => model_name,
        }
    }

    pub fn evaluation(&self) -> Option<&ModelEvaluation> {
        match self {
            ModelOutcome::Evaluated(evaluation) => Some(evaluation),
            ModelOutcome::Failed { .. } => None,
        }
    }
}

/// Fit and score every model in order, stopping at the first failure.
///
/// Either every model yields a record or the whole call fails; records of
/// models that already finished are dropped.
pub fn compare(
    models: &mut [NamedModel],
    split: &TrainTestSplit,
    clock: &dyn Clock,
) -> Result<Vec<ModelEvaluation>> {
    check_unique_names(models)?;
    split.validate()?;

    let mut evaluations = Vec::with_capacity(models.len());
    for (name, model) in models.iter_mut() {
        let evaluation = evaluate_model(name, model.as_mut(), split, clock).map_err(|e| {
            ModelingError::Model {
                model_name: name.clone(),
                source: Box::new(e),
            }
        })?;
        evaluations.push(evaluation);
    }

    info!("Compared {} models", evaluations.len());
    Ok(evaluations)
}

/// Like `compare`, but a failing model is reported and the loop moves on
pub fn compare_isolated(
    models: &mut [NamedModel],
    split: &TrainTestSplit,
    clock: &dyn Clock,
) -> Result<Vec<ModelOutcome>> {
    check_unique_names(models)?;
    split.validate()?;

    let outcomes: Vec<ModelOutcome> = models
        .iter_mut()
        .map(|(name, model)| match evaluate_model(name, model.as_mut(), split, clock) {
            Ok(evaluation) => ModelOutcome::Evaluated(evaluation),
            Err(e) => {
                warn!("Model {} failed: {}", name, e);
                ModelOutcome::Failed {
                    model_name: name.clone(),
                    reason: e.to_string(),
                }
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.evaluation().is_none()).count();
    info!(
        "Compared {} models ({} failed)",
        outcomes.len(),
        failed
    );
    Ok(outcomes)
}

fn evaluate_model(
    name: &str,
    model: &mut dyn Classifier,
    split: &TrainTestSplit,
    clock: &dyn Clock,
) -> Result<ModelEvaluation> {
    let started = clock.now();
    model.fit(&split.x_train, &split.y_train)?;
    let y_pred = model.predict(&split.x_test)?;
    let finished = clock.now();

    let elapsed_seconds = finished.saturating_sub(started).as_secs_f64();
    debug!("{}: fit+predict took {:.3}s", name, elapsed_seconds);

    Ok(ModelEvaluation {
        model_name: name.to_string(),
        accuracy: accuracy_score(&split.y_test, &y_pred)?,
        precision: precision_score(&split.y_test, &y_pred)?,
        recall: recall_score(&split.y_test, &y_pred)?,
        f1: f1_score(&split.y_test, &y_pred)?,
        confusion_matrix: ConfusionMatrix::from_predictions(&split.y_test, &y_pred)?,
        elapsed_seconds,
    })
}

fn check_unique_names(models: &[NamedModel]) -> Result<()> {
    let mut seen = HashSet::new();
    for (name, _) in models {
        if !seen.insert(name.as_str()) {
            return Err(ModelingError::DuplicateModel(name.clone()));
        }
    }
    Ok(())
}

/// Render evaluations as a fixed-width text table
pub fn format_table(evaluations: &[ModelEvaluation]) -> String {
    let name_width = evaluations
        .iter()
        .map(|e| e.model_name.len())
        .max()
        .unwrap_or(0)
        .max("Model".len());

    let mut table = format!(
        "{:<width$}  {:>8}  {:>9}  {:>6}  {:>6}  {:>9}\n",
        "Model",
        "Accuracy",
        "Precision",
        "Recall",
        "F1",
        "Time (s)",
        width = name_width
    );

    for e in evaluations {
        table.push_str(&format!(
            "{:<width$}  {:>8.4}  {:>9.4}  {:>6.4}  {:>6.4}  {:>9.3}\n",
            e.model_name,
            e.accuracy,
            e.precision,
            e.recall,
            e.f1,
            e.elapsed_seconds,
            width = name_width
        ));
    }

    table
}
