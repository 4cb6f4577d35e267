//! Configuration for the fraud decision pipeline

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Default high risk country codes
pub const DEFAULT_HIGH_RISK_COUNTRIES: [&str; 9] =
    ["RU", "CN", "IR", "NG", "KP", "SY", "VE", "US", "AF"];

/// Pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rule thresholds
    #[serde(default)]
    pub rules: RuleConfig,

    /// Risk model endpoint
    #[serde(default)]
    pub model: ModelConfig,

    /// Deadline and decision thresholds
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Audit backend
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Config {
    /// Reject settings under which the pipeline cannot honour its deadline
    pub fn validate(&self) -> Result<()> {
        if self.model.timeout_ms >= self.pipeline.deadline_ms {
            return Err(Error::Configuration(format!(
                "model timeout {}ms must be shorter than pipeline deadline {}ms",
                self.model.timeout_ms, self.pipeline.deadline_ms
            )));
        }

        let p = &self.pipeline;
        if !(0.0..=1.0).contains(&p.review_threshold)
            || !(0.0..=1.0).contains(&p.block_threshold)
            || p.review_threshold > p.block_threshold
        {
            return Err(Error::Configuration(format!(
                "decision thresholds out of order: review {} block {}",
                p.review_threshold, p.block_threshold
            )));
        }

        Ok(())
    }
}

/// Deterministic rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Amount above which a young account is flagged
    pub large_amount: Decimal,

    /// Accounts younger than this (days) count as new
    pub new_account_days: i64,

    /// Amount above which a new device is flagged
    pub new_device_amount: Decimal,

    /// Country codes treated as high risk (exact match)
    pub high_risk_countries: BTreeSet<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            large_amount: Decimal::from(1000),
            new_account_days: 7,
            new_device_amount: Decimal::from(500),
            high_risk_countries: DEFAULT_HIGH_RISK_COUNTRIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Risk model client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Scoring endpoint; `None` makes every model call fail fast
    pub url: Option<String>,

    /// Client timeout (ms), must be below the pipeline deadline
    pub timeout_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: 3_000,
        }
    }
}

impl ModelConfig {
    /// Client timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Deadline and decision scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// End-to-end deadline (ms)
    pub deadline_ms: u64,

    /// Extra time an in-flight audit write may take past the deadline (ms)
    pub audit_grace_ms: u64,

    /// Score returned when a rule blocks
    pub rule_block_score: f64,

    /// Score returned when the model cannot be consulted
    pub fallback_score: f64,

    /// Score written to the audit trail on the rule and fallback paths.
    /// Differs from the returned score for compatibility with existing
    /// audit consumers.
    pub degraded_audit_score: f64,

    /// Model score at or above which the decision is BLOCK
    pub block_threshold: f64,

    /// Model score at or above which the decision is REVIEW
    pub review_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 5_000,
            audit_grace_ms: 250,
            rule_block_score: 0.95,
            fallback_score: 0.5,
            degraded_audit_score: 0.96,
            block_threshold: 0.7,
            review_threshold: 0.4,
        }
    }
}

impl PipelineConfig {
    /// End-to-end deadline
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Audit grace period
    pub fn audit_grace(&self) -> Duration {
        Duration::from_millis(self.audit_grace_ms)
    }
}

/// Audit backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Postgres URL; when absent the file backend is used
    pub database_url: Option<String>,

    /// Pool size for the Postgres backend
    pub max_connections: u32,

    /// Append-only file for the fallback backend
    pub log_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 20,
            log_path: PathBuf::from("decisions.log"),
        }
    }
}
