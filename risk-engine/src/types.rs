//! Core types for the fraud decision pipeline

use crate::Error;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Incoming transaction as submitted by the caller
///
/// Only structurally decoded; out-of-range values (negative account age,
/// zero amount) are fed to the rules as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TransactionWire")]
pub struct Transaction {
    /// Caller-supplied transaction ID (not checked for uniqueness)
    pub id: String,

    /// User performing the transaction
    pub user_id: String,

    /// Monetary amount in `currency`
    pub amount: Decimal,

    /// Currency code
    pub currency: String,

    /// Originating IP address
    pub ip_address: String,

    /// Country code
    pub country: String,

    /// Device ID
    pub device_id: String,

    /// Age of the user's account in days
    pub account_age_days: i64,

    /// Transaction originates from a device not seen before
    pub is_new_device: bool,
}

/// Inbound shape of [`Transaction`]
///
/// Older clients send the account age as `amountAgeDays`. When both keys are
/// present the legacy one wins.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TransactionWire {
    id: String,
    user_id: String,
    amount: Decimal,
    currency: String,
    ip_address: String,
    country: String,
    device_id: String,
    account_age_days: Option<i64>,
    amount_age_days: Option<i64>,
    is_new_device: bool,
}

impl From<TransactionWire> for Transaction {
    fn from(wire: TransactionWire) -> Self {
        Self {
            id: wire.id,
            user_id: wire.user_id,
            amount: wire.amount,
            currency: wire.currency,
            ip_address: wire.ip_address,
            country: wire.country,
            device_id: wire.device_id,
            account_age_days: wire
                .amount_age_days
                .or(wire.account_age_days)
                .unwrap_or_default(),
            is_new_device: wire.is_new_device,
        }
    }
}

/// Decision label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskDecision {
    /// Proceed
    Allow,
    /// Manual review queue
    Review,
    /// Reject
    Block,
}

impl RiskDecision {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskDecision::Allow => "ALLOW",
            RiskDecision::Review => "REVIEW",
            RiskDecision::Block => "BLOCK",
        }
    }
}

impl fmt::Display for RiskDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score, label and reasons returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Risk score; 0.95 marks a rule block rather than a model score
    pub score: f64,

    /// Decision label
    pub decision: RiskDecision,

    /// Triggered rule reasons or the model failure, in evaluation order
    pub reasons: Vec<String>,
}

/// Result of one pipeline invocation
///
/// `error` is set when the decision was degraded (model unavailable) or when
/// the decision is sound but its audit record could not be written.
#[derive(Debug)]
pub struct Evaluation {
    /// The decision, always present
    pub decision: Decision,

    /// Non-fatal error encountered along the way
    pub error: Option<Error>,
}

impl Evaluation {
    /// Clean result
    pub fn clean(decision: Decision) -> Self {
        Self {
            decision,
            error: None,
        }
    }

    /// Result carrying a non-fatal error
    pub fn with_error(decision: Decision, error: Error) -> Self {
        Self {
            decision,
            error: Some(error),
        }
    }

    /// True when an error accompanies the decision
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Durable audit trail entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Transaction ID
    pub transaction_id: String,

    /// User ID
    pub user_id: String,

    /// Transaction amount
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Recorded score
    pub score: f64,

    /// Decision label
    pub decision: RiskDecision,

    /// Decision reasons
    pub reasons: Vec<String>,

    /// Logging time (UTC), not transaction time
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Build a record stamped with the current time
    pub fn new(tx: &Transaction, score: f64, decision: RiskDecision, reasons: &[String]) -> Self {
        Self {
            transaction_id: tx.id.clone(),
            user_id: tx.user_id.clone(),
            amount: tx.amount,
            score,
            decision,
            reasons: reasons.to_vec(),
            timestamp: Utc::now(),
        }
    }
}
