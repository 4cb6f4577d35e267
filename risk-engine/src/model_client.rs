//! Risk model client
//!
//! Sends a compact feature payload to the external scoring service and reads
//! back a single score. One attempt per call; no retries.

use crate::config::ModelConfig;
use crate::{Error, ModelCallError, Result, Transaction};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Source of model scores
#[async_trait]
pub trait RiskModel: Send + Sync {
    /// Score a transaction; the result is in [0, 1]
    async fn score(&self, tx: &Transaction) -> Result<f64>;
}

/// Features sent to the model server
#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    amount: f64,
    account_age: i64,
    is_new_device: bool,
    country: &'a str,
}

impl<'a> From<&'a Transaction> for ScoreRequest<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            amount: tx.amount.to_f64().unwrap_or(0.0),
            account_age: tx.account_age_days,
            is_new_device: tx.is_new_device,
            country: &tx.country,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score: f64,
}

/// HTTP client for the model server
pub struct HttpModelClient {
    endpoint: Option<String>,
    client: Client,
}

impl HttpModelClient {
    /// Create model client; a missing URL is accepted and reported per call
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = config.url.clone().filter(|url| !url.trim().is_empty());
        if endpoint.is_none() {
            warn!("MODEL_SERVER_URL not set, every model call will fall back to REVIEW");
        }

        Ok(Self { endpoint, client })
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

#[async_trait]
impl RiskModel for HttpModelClient {
    async fn score(&self, tx: &Transaction) -> Result<f64> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| Error::Configuration("MODEL_SERVER_URL not set".to_string()))?;

        let response = self
            .client
            .post(endpoint)
            .json(&ScoreRequest::from(tx))
            .send()
            .await
            .map_err(ModelCallError::Transport)?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ModelCallError::Status {
                status_code,
                message,
            }
            .into());
        }

        let body = response.bytes().await.map_err(ModelCallError::Transport)?;
        let parsed: ScoreResponse = serde_json::from_slice(&body)
            .map_err(|e| ModelCallError::MalformedResponse(e.to_string()))?;

        if !parsed.score.is_finite() {
            return Err(ModelCallError::MalformedResponse(format!(
                "non-finite score {}",
                parsed.score
            ))
            .into());
        }

        let score = parsed.score.clamp(0.0, 1.0);
        debug!(transaction_id = %tx.id, raw = parsed.score, score, "model score received");
        Ok(score)
    }
}
