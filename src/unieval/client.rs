//! Evaluator seam and the HTTP-backed implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::UniEvalConfig;
use crate::error::EvaluatorError;
use crate::unieval::device::Device;
use crate::unieval::record::EvalRecord;
use crate::unieval::{Dimension, EvalTask};

const PROVIDER: &str = "unieval";

/// Scores for one record, keyed by dimension name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DimScores(HashMap<String, f64>);

impl DimScores {
    /// Score for a dimension, `None` when the evaluator did not report it.
    pub fn get(&self, dim: Dimension) -> Option<f64> {
        self.0.get(dim.as_str()).copied()
    }
}

impl FromIterator<(String, f64)> for DimScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Scores a batch of formatted records along requested dimensions.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Task kind this evaluator was built for.
    fn task(&self) -> EvalTask;

    /// Score `records` along `dims`, one result per record in order. With
    /// `print_result` set, a per-dimension summary is logged after the call.
    async fn evaluate(
        &self,
        records: &[EvalRecord],
        dims: &[Dimension],
        print_result: bool,
    ) -> Result<Vec<DimScores>, EvaluatorError>;
}

/// Hands out evaluators for a task kind on a device.
pub trait EvaluatorProvider: Send + Sync {
    fn get(&self, task: EvalTask, device: &Device) -> Result<Arc<dyn Evaluator>, EvaluatorError>;
}

/// Provider backed by a UniEval serving endpoint.
pub struct HttpEvaluatorProvider {
    client: Client,
    config: UniEvalConfig,
}

impl HttpEvaluatorProvider {
    pub fn new(config: UniEvalConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }
}

impl EvaluatorProvider for HttpEvaluatorProvider {
    fn get(&self, task: EvalTask, device: &Device) -> Result<Arc<dyn Evaluator>, EvaluatorError> {
        tracing::debug!("Creating {} evaluator on {}", task, device);
        Ok(Arc::new(HttpEvaluator {
            client: self.client.clone(),
            config: self.config.clone(),
            task,
            device: device.clone(),
        }))
    }
}

/// Evaluator that delegates scoring to the serving endpoint.
pub struct HttpEvaluator {
    client: Client,
    config: UniEvalConfig,
    task: EvalTask,
    device: Device,
}

#[derive(Serialize)]
struct EvaluateRequest<'a> {
    task: EvalTask,
    device: &'a str,
    dims: &'a [Dimension],
    records: &'a [EvalRecord],
}

#[derive(Deserialize)]
struct EvaluateResponse {
    scores: Vec<DimScores>,
}

impl HttpEvaluator {
    fn api_url(&self) -> String {
        format!("{}/evaluate", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_request(
        &self,
        body: &EvaluateRequest<'_>,
    ) -> Result<EvaluateResponse, EvaluatorError> {
        let url = self.api_url();

        tracing::debug!("Sending evaluate request to {}", url);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key.expose_secret()));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("UniEval request failed: {}", e);
            EvaluatorError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();

        tracing::debug!("UniEval response status: {}", status);

        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(EvaluatorError::AuthFailed {
                    provider: PROVIDER.to_string(),
                });
            }
            if status.as_u16() == 429 {
                return Err(EvaluatorError::RateLimited {
                    provider: PROVIDER.to_string(),
                    retry_after: None,
                });
            }
            return Err(EvaluatorError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("HTTP {}: {}", status, response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| EvaluatorError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: format!("JSON parse error: {}", e),
        })
    }
}

#[async_trait]
impl Evaluator for HttpEvaluator {
    fn task(&self) -> EvalTask {
        self.task
    }

    async fn evaluate(
        &self,
        records: &[EvalRecord],
        dims: &[Dimension],
        print_result: bool,
    ) -> Result<Vec<DimScores>, EvaluatorError> {
        let request = EvaluateRequest {
            task: self.task,
            device: self.device.as_str(),
            dims,
            records,
        };
        let response = self.send_request(&request).await?;

        if response.scores.len() != records.len() {
            return Err(EvaluatorError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: format!(
                    "expected {} score entries, got {}",
                    records.len(),
                    response.scores.len()
                ),
            });
        }

        if print_result {
            for dim in dims {
                let values: Vec<f64> =
                    response.scores.iter().filter_map(|s| s.get(*dim)).collect();
                if values.is_empty() {
                    continue;
                }
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                tracing::info!("{} {}: mean {:.4} over {} records", self.task, dim, mean, values.len());
            }
        }

        Ok(response.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unieval::record::summarization_records;

    #[test]
    fn test_dim_scores_typed_lookup() {
        let scores: DimScores = vec![("fluency".to_string(), 0.91)].into_iter().collect();
        assert_eq!(scores.get(Dimension::Fluency), Some(0.91));
        assert_eq!(scores.get(Dimension::Naturalness), None);
    }

    #[test]
    fn test_evaluate_request_wire_format() {
        let records = summarization_records(&["some text".to_string()], &[], &[]);
        let request = EvaluateRequest {
            task: EvalTask::Summarization,
            device: "cpu",
            dims: &[Dimension::Fluency],
            records: &records,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["task"], "summarization");
        assert_eq!(json["device"], "cpu");
        assert_eq!(json["dims"], serde_json::json!(["fluency"]));
        assert_eq!(json["records"][0]["system_output"], "some text");
        assert_eq!(json["records"][0]["source"], "");
        assert_eq!(json["records"][0]["reference"], "");
    }

    #[test]
    fn test_evaluate_response_parses_missing_dims() {
        let raw = r#"{"scores": [{"naturalness": 0.8}, {}]}"#;
        let response: EvaluateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.scores.len(), 2);
        assert_eq!(response.scores[0].get(Dimension::Naturalness), Some(0.8));
        assert_eq!(response.scores[1].get(Dimension::Naturalness), None);
    }

    #[test]
    fn test_provider_builds_evaluator_for_task() {
        let provider = HttpEvaluatorProvider::new(UniEvalConfig::default());
        let evaluator = provider.get(EvalTask::Dialogue, &Device::cpu()).unwrap();
        assert_eq!(evaluator.task(), EvalTask::Dialogue);
    }

    #[test]
    fn test_api_url_joins_cleanly() {
        let evaluator = HttpEvaluator {
            client: Client::new(),
            config: UniEvalConfig {
                base_url: "http://localhost:9000/".to_string(),
                ..UniEvalConfig::default()
            },
            task: EvalTask::Summarization,
            device: Device::cpu(),
        };
        assert_eq!(evaluator.api_url(), "http://localhost:9000/evaluate");
    }
}
