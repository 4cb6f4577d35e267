use actix_web::{web, HttpResponse};
use risk_engine::metrics::gather_metrics;
use risk_engine::{Evaluation, FraudChecker, RiskDecision, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct FraudCheckResponse {
    pub score: f64,
    pub decision: RiskDecision,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Evaluation> for FraudCheckResponse {
    fn from(evaluation: Evaluation) -> Self {
        FraudCheckResponse {
            score: evaluation.decision.score,
            decision: evaluation.decision.decision,
            reasons: evaluation.decision.reasons,
            error: evaluation.error.map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub audit_backend: String,
}

// ===== Fraud Check =====
pub async fn fraud_check(body: web::Bytes, checker: web::Data<FraudChecker>) -> HttpResponse {
    let tx: Transaction = match serde_json::from_slice(&body) {
        Ok(tx) => tx,
        Err(e) => {
            warn!("Rejecting malformed transaction: {}", e);
            return HttpResponse::BadRequest().body("Invalid request body");
        }
    };

    let evaluation = checker.check(&tx).await;
    let response = FraudCheckResponse::from(evaluation);

    // Degraded results are still actionable, flag them with 202
    if response.error.is_some() {
        HttpResponse::Accepted().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}

// ===== Health Check =====
pub async fn health_check(checker: web::Data<FraudChecker>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        audit_backend: checker.audit().backend_name().to_string(),
    })
}

// ===== Prometheus Metrics =====
pub async fn metrics() -> HttpResponse {
    match gather_metrics() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/fraud-check", web::post().to(fraud_check))
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics));
}
