use crate::models::{CalorieState, Classification};
use crate::score::format_score;

pub const HEALTHY_NO_CALORIES: &str = "Health Score 1";
pub const CONSULT_DOCTOR: &str = "You Should Consult to Doctor";

pub fn format_message(
    classification: Classification,
    calories: CalorieState,
    heart_rate: &str,
    score: Option<f64>,
) -> String {
    match (classification, calories, score) {
        (Classification::Healthy, CalorieState::Present { .. }, Some(score)) => format!(
            "Healthy but you could burn few {heart_rate} calorie to get Fit Your Current Health Score {}",
            format_score(score)
        ),
        (Classification::Healthy, _, _) => HEALTHY_NO_CALORIES.to_string(),
        (Classification::NotHealthy, _, _) => CONSULT_DOCTOR.to_string(),
        (Classification::Unknown, _, _) => heart_rate.to_string(),
    }
}
