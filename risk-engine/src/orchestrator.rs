//! Fraud decision pipeline
//!
//! Rules first; any hit blocks without consulting the model. Otherwise the
//! risk model is called under the request deadline and its score mapped to a
//! decision. Every invocation attempts exactly one audit write.

use crate::audit::AuditLogger;
use crate::config::{Config, PipelineConfig};
use crate::metrics::{DECISIONS_TOTAL, MODEL_CALL_FAILURES, PIPELINE_DURATION};
use crate::model_client::{HttpModelClient, RiskModel};
use crate::rules::RuleEngine;
use crate::{AuditRecord, Decision, Error, Evaluation, Result, RiskDecision, Transaction};
use std::sync::Arc;
use std::time::Instant as StdInstant;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

/// Decision orchestrator
pub struct FraudChecker {
    rules: RuleEngine,
    model: Arc<dyn RiskModel>,
    audit: AuditLogger,
    config: PipelineConfig,
}

impl FraudChecker {
    /// Create checker from its parts
    pub fn new(
        rules: RuleEngine,
        model: Arc<dyn RiskModel>,
        audit: AuditLogger,
        config: PipelineConfig,
    ) -> Self {
        Self {
            rules,
            model,
            audit,
            config,
        }
    }

    /// Build the production pipeline: HTTP model client plus the given
    /// audit logger.
    pub fn from_config(config: &Config, audit: AuditLogger) -> Result<Self> {
        config.validate()?;
        let model = HttpModelClient::new(&config.model)?;

        Ok(Self::new(
            RuleEngine::new(config.rules.clone()),
            Arc::new(model),
            audit,
            config.pipeline.clone(),
        ))
    }

    /// Audit logger in use
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Run the pipeline under the configured default deadline
    pub async fn check(&self, tx: &Transaction) -> Evaluation {
        let deadline = Instant::now() + self.config.deadline();
        self.check_fraud(tx, deadline).await
    }

    /// Run the pipeline; returns no later than `deadline` plus the audit
    /// grace period.
    #[instrument(skip(self, tx, deadline), fields(transaction_id = %tx.id))]
    pub async fn check_fraud(&self, tx: &Transaction, deadline: Instant) -> Evaluation {
        let started = StdInstant::now();

        let hits = self.rules.evaluate(tx);
        let (path, evaluation) = if hits.is_empty() {
            self.model_path(tx, deadline).await
        } else {
            let reasons: Vec<String> = hits.into_iter().map(|r| r.reason).collect();
            ("rules", self.rule_path(tx, reasons, deadline).await)
        };

        DECISIONS_TOTAL
            .with_label_values(&[evaluation.decision.decision.as_str(), path])
            .inc();
        PIPELINE_DURATION
            .with_label_values(&[path])
            .observe(started.elapsed().as_secs_f64());

        evaluation
    }

    async fn rule_path(&self, tx: &Transaction, reasons: Vec<String>, deadline: Instant) -> Evaluation {
        info!(reasons = ?reasons, "transaction blocked by rules");

        let record = AuditRecord::new(
            tx,
            self.config.degraded_audit_score,
            RiskDecision::Block,
            &reasons,
        );
        self.audit
            .record_best_effort(&record, self.audit_cutoff(deadline))
            .await;

        Evaluation::clean(Decision {
            score: self.config.rule_block_score,
            decision: RiskDecision::Block,
            reasons,
        })
    }

    async fn model_path(&self, tx: &Transaction, deadline: Instant) -> (&'static str, Evaluation) {
        let scored = match tokio::time::timeout_at(deadline, self.model.score(tx)).await {
            Ok(result) => result,
            Err(_) => Err(Error::DeadlineExceeded { stage: "model call" }),
        };

        match scored {
            Ok(score) => ("model", self.scored(tx, score, deadline).await),
            Err(e) => ("fallback", self.fallback(tx, e, deadline).await),
        }
    }

    async fn fallback(&self, tx: &Transaction, error: Error, deadline: Instant) -> Evaluation {
        MODEL_CALL_FAILURES.with_label_values(&[error.kind()]).inc();
        warn!(kind = error.kind(), "model call failed, routing to REVIEW: {}", error);

        let reasons = vec![format!("Model call failed: {}", error)];
        let record = AuditRecord::new(
            tx,
            self.config.degraded_audit_score,
            RiskDecision::Review,
            &reasons,
        );
        self.audit
            .record_best_effort(&record, self.audit_cutoff(deadline))
            .await;

        Evaluation::with_error(
            Decision {
                score: self.config.fallback_score,
                decision: RiskDecision::Review,
                reasons,
            },
            error,
        )
    }

    async fn scored(&self, tx: &Transaction, score: f64, deadline: Instant) -> Evaluation {
        let decision = Decision {
            score,
            decision: self.decide(score),
            reasons: Vec::new(),
        };
        info!(score, decision = %decision.decision, "model decision");

        let record = AuditRecord::new(tx, score, decision.decision, &decision.reasons);
        match self.audit.record(&record, self.audit_cutoff(deadline)).await {
            Ok(()) => Evaluation::clean(decision),
            Err(e) => Evaluation::with_error(decision, Error::AuditWrite(e)),
        }
    }

    /// Map a model score to a decision label
    pub fn decide(&self, score: f64) -> RiskDecision {
        if score >= self.config.block_threshold {
            RiskDecision::Block
        } else if score >= self.config.review_threshold {
            RiskDecision::Review
        } else {
            RiskDecision::Allow
        }
    }

    fn audit_cutoff(&self, deadline: Instant) -> Instant {
        deadline + self.config.audit_grace()
    }
}
