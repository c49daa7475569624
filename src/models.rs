use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalorieState {
    Absent,
    Present { remaining: i64 },
}

impl CalorieState {
    pub fn is_present(&self) -> bool {
        matches!(self, CalorieState::Present { .. })
    }

    pub fn remaining(&self) -> Option<i64> {
        match self {
            CalorieState::Present { remaining } => Some(*remaining),
            CalorieState::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    Healthy,
    NotHealthy,
    Unknown,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Healthy => "healthy",
            Classification::NotHealthy => "not healthy",
            Classification::Unknown => "unknown",
        }
    }
}

/// Latest raw readings as delivered by the UI side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readings {
    pub heart_rate: Option<String>,
    pub calorie_burn: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub heart_rate_raw: String,
    pub heart_rate: Option<String>,
    pub calories: CalorieState,
    pub score: Option<f64>,
    pub classification: Classification,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingRow {
    pub heart_rate: String,
    #[serde(default)]
    pub calories: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeartBeatCheckRequest {
    pub age: String,
    #[serde(rename = "heartBeat")]
    pub heart_beat: String,
}
