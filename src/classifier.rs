use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::{ClassifierConfig, CHECK_AGE};
use crate::error::ClassificationUnavailable;
use crate::models::{Classification, HeartBeatCheckRequest};

const HEALTHY_RESULT: &str = "1";
const RESULT_FIELD: &str = "Result";

#[async_trait]
pub trait HeartRateClassifier: Send + Sync {
    /// One verdict for a sanitized heart rate. Never retried.
    async fn classify(&self, heart_rate: &str) -> Result<Classification, ClassificationUnavailable>;
}

/// Remote heart-beat check over HTTP.
pub struct HttpClassifier {
    http_client: Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("health-score/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl HeartRateClassifier for HttpClassifier {
    async fn classify(&self, heart_rate: &str) -> Result<Classification, ClassificationUnavailable> {
        let payload = HeartBeatCheckRequest {
            age: CHECK_AGE.to_string(),
            heart_beat: heart_rate.to_string(),
        };

        debug!("POST {} heartBeat={}", self.endpoint, heart_rate);

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassificationUnavailable::Status(status));
        }

        let body = response.text().await?;
        interpret_response(&body)
    }
}

/// The body must be a JSON object carrying `Result`. Any present value is read
/// as a string, so only `"1"` (or a bare `1`) counts as healthy.
pub fn interpret_response(body: &str) -> Result<Classification, ClassificationUnavailable> {
    let response: Value = serde_json::from_str(body)
        .map_err(|err| ClassificationUnavailable::Malformed(err.to_string()))?;

    let fields = match response {
        Value::Object(fields) => fields,
        other => {
            return Err(ClassificationUnavailable::Malformed(format!(
                "expected a JSON object, got {other}"
            )));
        }
    };

    let result = match fields.get(RESULT_FIELD) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(ClassificationUnavailable::Malformed(
                "missing Result field".to_string(),
            ));
        }
    };

    debug!("health check result {result:?}");

    if result == HEALTHY_RESULT {
        Ok(Classification::Healthy)
    } else {
        Ok(Classification::NotHealthy)
    }
}
