//! Error types for the fraud decision pipeline

use thiserror::Error;

/// Pipeline error
///
/// Every variant is non-fatal: the pipeline still returns a decision
/// alongside it.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or inconsistent configuration (e.g. no model endpoint)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Risk model call failed
    #[error(transparent)]
    ModelCall(#[from] ModelCallError),

    /// Stage cut off by the request deadline
    #[error("Deadline exceeded during {stage}")]
    DeadlineExceeded {
        /// Pipeline stage that was running
        stage: &'static str,
    },

    /// Decision succeeded but the audit record could not be written
    #[error("logging error: {0}")]
    AuditWrite(#[source] AuditError),
}

impl Error {
    /// True when the decision itself is trustworthy and only the audit trail
    /// may be incomplete.
    pub fn is_audit_failure(&self) -> bool {
        matches!(self, Error::AuditWrite(_))
    }

    /// True when the model could not be consulted and the decision was
    /// degraded to the conservative fallback.
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_) | Error::ModelCall(_) | Error::DeadlineExceeded { .. }
        )
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::ModelCall(ModelCallError::Transport(_)) => "transport",
            Error::ModelCall(ModelCallError::Status { .. }) => "status",
            Error::ModelCall(ModelCallError::MalformedResponse(_)) => "malformed_response",
            Error::DeadlineExceeded { .. } => "deadline",
            Error::AuditWrite(_) => "audit",
        }
    }
}

/// Failure talking to the risk model server
#[derive(Debug, Error)]
pub enum ModelCallError {
    /// Network or client-side failure, including the client timeout
    #[error("model server request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("model server returned status {status_code}{}", body_suffix(.message))]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Response body, if any
        message: String,
    },

    /// Body could not be decoded into a score
    #[error("malformed model server response: {0}")]
    MalformedResponse(String),
}

fn body_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

/// Failure persisting an audit record
#[derive(Debug, Error)]
pub enum AuditError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write abandoned after the deadline grace period
    #[error("audit write timed out")]
    Timeout,
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
