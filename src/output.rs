//! JSON shapes written to stdout by the command-line front end

use serde_json::{json, Value};
use yt_core::{FieldSelection, VideoRecord};
use yt_modeling::{format_table, ModelEvaluation, ModelOutcome};

/// Tabular view of a video batch: `columns` in selection order, one row per video
pub fn video_table(selection: &FieldSelection, records: &[VideoRecord]) -> Value {
    let rows: Vec<Value> = records.iter().map(|record| json!(record.to_row())).collect();
    json!({
        "columns": selection.columns(),
        "rows": rows,
    })
}

/// Comparison results plus a rendered text table of the models that finished
pub fn comparison_report(outcomes: &[ModelOutcome]) -> Value {
    let evaluations: Vec<ModelEvaluation> = outcomes
        .iter()
        .filter_map(|outcome| outcome.evaluation().cloned())
        .collect();
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|outcome| outcome.evaluation().is_none())
        .map(|outcome| outcome.model_name())
        .collect();

    json!({
        "models": outcomes,
        "failed": failed,
        "table": format_table(&evaluations),
    })
}
