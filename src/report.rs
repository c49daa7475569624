use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{CalorieState, Classification, Evaluation};
use crate::score::format_score;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

pub fn summarize_by_classification(evaluations: &[Evaluation]) -> Vec<(Classification, usize)> {
    let mut counts: BTreeMap<Classification, usize> = BTreeMap::new();
    for evaluation in evaluations {
        *counts.entry(evaluation.classification).or_insert(0) += 1;
    }

    let mut summaries: Vec<(Classification, usize)> = counts.into_iter().collect();
    summaries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    summaries
}

pub fn summarize_scores(evaluations: &[Evaluation]) -> Option<ScoreSummary> {
    let scores: Vec<f64> = evaluations.iter().filter_map(|e| e.score).collect();
    if scores.is_empty() {
        return None;
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;

    Some(ScoreSummary {
        count: scores.len(),
        min,
        max,
        mean,
    })
}

fn calorie_label(calories: CalorieState) -> String {
    match calories {
        CalorieState::Present { remaining } => format!("{remaining} remaining"),
        CalorieState::Absent => "unset".to_string(),
    }
}

pub fn build_report(evaluations: &[Evaluation], generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Health Score Report");
    let _ = writeln!(
        output,
        "Generated {} across {} evaluations",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        evaluations.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Classification Mix");

    let mix = summarize_by_classification(evaluations);
    if mix.is_empty() {
        let _ = writeln!(output, "No readings evaluated.");
    } else {
        for (classification, count) in mix {
            let _ = writeln!(output, "- {}: {}", classification.label(), count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Health Scores");

    match summarize_scores(evaluations) {
        Some(summary) => {
            let _ = writeln!(
                output,
                "- {} scored (min {}, max {}, mean {})",
                summary.count,
                format_score(summary.min),
                format_score(summary.max),
                format_score(summary.mean)
            );
        }
        None => {
            let _ = writeln!(output, "No readings carried a calorie burn.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Evaluations");

    if evaluations.is_empty() {
        let _ = writeln!(output, "No readings evaluated.");
    } else {
        for evaluation in evaluations {
            let _ = writeln!(
                output,
                "- {} {} (calories {}, {}): {}",
                evaluation.evaluated_at.format("%H:%M:%S"),
                evaluation.heart_rate_raw,
                calorie_label(evaluation.calories),
                evaluation.classification.label(),
                evaluation.message
            );
        }
    }

    output
}
