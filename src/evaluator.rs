use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classifier::HeartRateClassifier;
use crate::message::format_message;
use crate::models::{Classification, Evaluation};
use crate::score::{
    compute_health_score, derive_calorie_state, sanitize_heart_rate, strip_heart_rate_unit,
};

pub struct Evaluator<C> {
    classifier: C,
}

impl<C: HeartRateClassifier> Evaluator<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Runs one evaluation cycle. Every failure degrades into the message.
    pub async fn evaluate(&self, heart_rate_raw: &str, calorie_raw: Option<&str>) -> Evaluation {
        let id = Uuid::new_v4();
        let calories = derive_calorie_state(calorie_raw);
        let score = calories.remaining().map(compute_health_score);

        let (heart_rate, classification, shown) = match sanitize_heart_rate(heart_rate_raw) {
            Ok(digits) => {
                let classification = match self.classifier.classify(&digits).await {
                    Ok(classification) => classification,
                    Err(err) => {
                        warn!(%id, "{err}; showing raw heart rate");
                        Classification::Unknown
                    }
                };
                (Some(digits.clone()), classification, digits)
            }
            Err(err) => {
                warn!(%id, "{err}; skipping health check");
                (None, Classification::Unknown, strip_heart_rate_unit(heart_rate_raw))
            }
        };

        let message = format_message(classification, calories, &shown, score);
        info!(
            %id,
            classification = classification.label(),
            calories_present = calories.is_present(),
            "evaluation finished"
        );

        Evaluation {
            id,
            evaluated_at: Utc::now(),
            heart_rate_raw: heart_rate_raw.to_string(),
            heart_rate,
            calories,
            score,
            classification,
            message,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ClassificationUnavailable;
    use crate::models::CalorieState;

    /// Replies with a fixed verdict and records what it was asked.
    pub(crate) struct StubClassifier {
        pub verdict: Option<Classification>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubClassifier {
        pub(crate) fn replying(verdict: Classification) -> Self {
            Self {
                verdict: Some(verdict),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                verdict: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HeartRateClassifier for StubClassifier {
        async fn classify(&self, heart_rate: &str) -> Result<Classification, ClassificationUnavailable> {
            self.calls.lock().unwrap().push(heart_rate.to_string());
            self.verdict
                .ok_or_else(|| ClassificationUnavailable::Malformed("stub failure".to_string()))
        }
    }

    #[tokio::test]
    async fn healthy_without_calories() {
        let evaluator = Evaluator::new(StubClassifier::replying(Classification::Healthy));
        let evaluation = evaluator.evaluate("72BPM", None).await;

        assert_eq!(evaluation.message, "Health Score 1");
        assert_eq!(evaluation.heart_rate.as_deref(), Some("72"));
        assert_eq!(evaluation.calories, CalorieState::Absent);
        assert!(evaluation.score.is_none());
        assert_eq!(*evaluator.classifier.calls.lock().unwrap(), vec!["72".to_string()]);
    }

    #[tokio::test]
    async fn healthy_with_calories() {
        let evaluator = Evaluator::new(StubClassifier::replying(Classification::Healthy));
        let evaluation = evaluator.evaluate("150BPM", Some("100000")).await;

        assert_eq!(evaluation.calories, CalorieState::Present { remaining: 200_000 });
        let score = evaluation.score.unwrap();
        assert!((score - 0.933_333_333).abs() < 1e-6);
        assert_eq!(
            evaluation.message,
            "Healthy but you could burn few 150 calorie to get Fit Your Current Health Score 0.9333333"
        );
    }

    #[tokio::test]
    async fn unhealthy_regardless_of_calories() {
        let evaluator = Evaluator::new(StubClassifier::replying(Classification::NotHealthy));
        for calories in [None, Some("100000"), Some("400000")] {
            let evaluation = evaluator.evaluate("40BPM", calories).await;
            assert_eq!(evaluation.message, "You Should Consult to Doctor");
        }
    }

    #[tokio::test]
    async fn failed_check_shows_heart_rate() {
        let evaluator = Evaluator::new(StubClassifier::failing());
        let evaluation = evaluator.evaluate("72BPM", Some("100000")).await;

        assert_eq!(evaluation.classification, Classification::Unknown);
        assert_eq!(evaluation.message, "72");
    }

    #[tokio::test]
    async fn invalid_heart_rate_skips_check() {
        let evaluator = Evaluator::new(StubClassifier::replying(Classification::Healthy));
        let evaluation = evaluator.evaluate(" ", None).await;

        assert_eq!(evaluation.classification, Classification::Unknown);
        assert!(evaluation.heart_rate.is_none());
        assert_eq!(evaluation.message, "");
        assert!(evaluator.classifier.calls.lock().unwrap().is_empty());

        let evaluation = evaluator.evaluate("fastBPM", None).await;
        assert_eq!(evaluation.message, "fast");
    }
}
