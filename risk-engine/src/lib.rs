//! Risk Engine
//!
//! Real-time fraud decisions for payment transactions: deterministic rules,
//! an external risk model, threshold decisioning and a durable audit trail,
//! all bounded by a per-request deadline.
//!
//! ## Pipeline
//!
//! ```text
//! Transaction ──► RuleEngine ──hit──► BLOCK (0.95)
//!                     │
//!                   clean
//!                     ▼
//!               RiskModel (HTTP) ──fail──► REVIEW (0.5) + error
//!                     │
//!                   score
//!                     ▼
//!         ≥0.7 BLOCK / ≥0.4 REVIEW / ALLOW
//!                     │
//!                     ▼
//!               AuditLogger (Postgres | file)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod config;
pub mod error;
#[allow(missing_docs)]
pub mod metrics;
pub mod model_client;
pub mod orchestrator;
pub mod rules;
pub mod types;

pub use audit::{AuditBackend, AuditLogger};
pub use config::Config;
pub use error::{AuditError, Error, ModelCallError, Result};
pub use model_client::{HttpModelClient, RiskModel};
pub use orchestrator::FraudChecker;
pub use rules::{RuleEngine, RuleResult};
pub use types::*;
