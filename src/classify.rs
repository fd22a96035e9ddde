//! Classifier boundary: a trait for black-box sentiment models plus the
//! hosted-inference HTTP client used in production. Each model maps a string
//! to one (label, confidence) pair; vocabularies differ per model and are
//! reconciled in [`crate::sentiment`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::sentiment::ClassifierOutput;

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify one text. A failure here fails the ticker computation that
    /// requested it; recovery policy lives with the caller.
    async fn classify(&self, text: &str) -> Result<ClassifierOutput>;

    /// Model name for diagnostics/logging.
    fn name(&self) -> &str;
}

/// Alias used by the ensemble and the bootstrap code.
pub type DynClassifier = Arc<dyn SentimentClassifier>;

/// Client for a hosted inference endpoint serving a text-classification
/// model. Requires `HF_API_TOKEN`; carries connect and total timeouts so a
/// stuck inference backend fails the call instead of hanging the pipeline.
pub struct InferenceApiClassifier {
    http: reqwest::Client,
    api_token: String,
    model: String,
    endpoint: String,
}

impl InferenceApiClassifier {
    pub fn new(model: &str) -> Self {
        Self::with_endpoint(model, "https://api-inference.huggingface.co/models")
    }

    /// `endpoint` is the base URL without the trailing model path; split out
    /// so tests can point the client at a local stub server.
    pub fn with_endpoint(model: &str, endpoint: &str) -> Self {
        let api_token = std::env::var("HF_API_TOKEN").unwrap_or_default();
        let http = reqwest::Client::builder()
            .user_agent("ticker-sentiment-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_token,
            model: model.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Hosted endpoints answer either `[[{label,score},..]]` or `[{label,score},..]`
/// depending on the pipeline wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_top(self) -> Option<ClassifierOutput> {
        let candidates = match self {
            Self::Nested(mut outer) => {
                if outer.is_empty() {
                    return None;
                }
                outer.remove(0)
            }
            Self::Flat(inner) => inner,
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|top| ClassifierOutput {
                label: top.label,
                confidence: top.score,
            })
    }
}

#[async_trait]
impl SentimentClassifier for InferenceApiClassifier {
    async fn classify(&self, text: &str) -> Result<ClassifierOutput> {
        let url = format!("{}/{}", self.endpoint, self.model);
        let mut req = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "inputs": text }));
        if !self.api_token.is_empty() {
            req = req.bearer_auth(&self.api_token);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("calling inference endpoint for {}", self.model))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("inference endpoint {} returned {}", self.model, status));
        }

        let body: InferenceResponse = resp
            .json()
            .await
            .with_context(|| format!("decoding inference response from {}", self.model))?;
        body.into_top()
            .ok_or_else(|| anyhow!("inference endpoint {} returned no candidates", self.model))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
