use tracing::warn;

use crate::error::InvalidInputError;
use crate::models::CalorieState;

pub const CALORIE_BUDGET: i64 = 300_000;
pub const SCORE_SCALE: f64 = 1_500_000.0;
pub const HEART_RATE_UNIT: &str = "BPM";

/// The reading with its unit removed, whether or not what is left is numeric.
pub fn strip_heart_rate_unit(raw: &str) -> String {
    raw.replace(HEART_RATE_UNIT, "").trim().to_string()
}

pub fn sanitize_heart_rate(raw: &str) -> Result<String, InvalidInputError> {
    let digits = strip_heart_rate_unit(raw);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(InvalidInputError::new("heart rate", raw));
    }

    Ok(digits)
}

pub fn parse_calorie_burn(raw: &str) -> Result<u64, InvalidInputError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u64>()
        .map_err(|_| InvalidInputError::new("calorie burn", raw))
}

/// Remaining calories against the budget; the remaining value is what the
/// score is computed from afterwards.
pub fn derive_calorie_state(raw: Option<&str>) -> CalorieState {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return CalorieState::Absent;
    };

    let burned = match parse_calorie_burn(raw) {
        Ok(burned) => burned,
        Err(err) => {
            warn!("{err}; treating calories as unset");
            return CalorieState::Absent;
        }
    };

    match i64::try_from(burned) {
        Ok(burned) if burned < CALORIE_BUDGET => CalorieState::Present {
            remaining: CALORIE_BUDGET - burned,
        },
        _ => CalorieState::Absent,
    }
}

/// Not clamped: values outside [0, 1] pass through unchanged.
pub fn compute_health_score(remaining: i64) -> f64 {
    1.0 - ((CALORIE_BUDGET as f64 - remaining as f64) / SCORE_SCALE)
}

pub fn format_score(score: f64) -> String {
    let mut text = format!("{score:.7}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unit_suffix() {
        for digits in ["0", "72", "150", "00190"] {
            assert_eq!(sanitize_heart_rate(&format!("{digits}BPM")).unwrap(), digits);
        }
        assert_eq!(sanitize_heart_rate("72 BPM").unwrap(), "72");
        assert_eq!(sanitize_heart_rate("88").unwrap(), "88");
        assert_eq!(strip_heart_rate_unit(" fastBPM "), "fast");
    }

    #[test]
    fn rejects_unusable_heart_rate() {
        assert!(sanitize_heart_rate(" ").is_err());
        assert!(sanitize_heart_rate("BPM").is_err());
        assert!(sanitize_heart_rate("7x2BPM").is_err());
        assert!(sanitize_heart_rate("-72BPM").is_err());

        let err = sanitize_heart_rate("fast").unwrap_err();
        assert_eq!(err.field, "heart rate");
        assert_eq!(err.raw, "fast");
    }

    #[test]
    fn remaining_calories_below_budget() {
        for burned in [0_i64, 1, 100_000, 299_999] {
            let state = derive_calorie_state(Some(&burned.to_string()));
            assert_eq!(
                state,
                CalorieState::Present {
                    remaining: CALORIE_BUDGET - burned
                }
            );
        }
    }

    #[test]
    fn budget_reached_means_absent() {
        for burned in ["300000", "300001", "999999999", "99999999999999999999999"] {
            assert_eq!(derive_calorie_state(Some(burned)), CalorieState::Absent);
        }
    }

    #[test]
    fn unset_or_unparseable_calories_are_absent() {
        assert_eq!(derive_calorie_state(None), CalorieState::Absent);
        assert_eq!(derive_calorie_state(Some(" ")), CalorieState::Absent);
        assert_eq!(derive_calorie_state(Some("kcal")), CalorieState::Absent);
    }

    #[test]
    fn calorie_digits_are_filtered() {
        assert_eq!(
            derive_calorie_state(Some("1,500 kcal")),
            CalorieState::Present { remaining: 298_500 }
        );
    }

    #[test]
    fn score_uses_remaining_calories() {
        let score = compute_health_score(200_000);
        assert!((score - (1.0 - 100_000.0 / 1_500_000.0)).abs() < 1e-12);
        assert_eq!(compute_health_score(200_000), score);
        assert_eq!(compute_health_score(CALORIE_BUDGET), 1.0);
    }

    #[test]
    fn score_is_unbounded() {
        assert!(compute_health_score(-3_000_000) < 0.0);
        assert!(compute_health_score(3_000_000) > 1.0);
    }

    #[test]
    fn scores_render_with_seven_decimals() {
        assert_eq!(format_score(compute_health_score(200_000)), "0.9333333");
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.85), "0.85");
    }
}
