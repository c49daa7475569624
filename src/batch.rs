use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::classifier::HeartRateClassifier;
use crate::evaluator::Evaluator;
use crate::models::{Evaluation, ReadingRow};

/// Rows need a `heart_rate` column; an empty `calories` cell means unset.
pub fn load_readings(csv_path: &Path) -> anyhow::Result<Vec<ReadingRow>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut rows = Vec::new();

    for (index, result) in reader.deserialize::<ReadingRow>().enumerate() {
        let row = result.with_context(|| format!("invalid reading on row {}", index + 1))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Evaluates rows one at a time, in file order.
pub async fn evaluate_all<C: HeartRateClassifier>(
    evaluator: &Evaluator<C>,
    rows: &[ReadingRow],
) -> Vec<Evaluation> {
    let mut evaluations = Vec::with_capacity(rows.len());
    for row in rows {
        evaluations.push(evaluator.evaluate(&row.heart_rate, row.calories.as_deref()).await);
    }

    info!("evaluated {} readings", evaluations.len());
    evaluations
}
