use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // Decisions by label and path (rules / model / fallback)
    pub static ref DECISIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "fraud_decisions_total",
        "Total fraud decisions",
        &["decision", "path"]
    ).expect("metric can be created");

    pub static ref MODEL_CALL_FAILURES: IntCounterVec = register_int_counter_vec!(
        "fraud_model_call_failures_total",
        "Risk model calls that fell back to REVIEW",
        &["kind"]
    ).expect("metric can be created");

    pub static ref AUDIT_WRITE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "fraud_audit_write_failures_total",
        "Audit records that could not be written",
        &["backend"]
    ).expect("metric can be created");

    pub static ref PIPELINE_DURATION: HistogramVec = register_histogram_vec!(
        "fraud_pipeline_duration_seconds",
        "End-to-end fraud check duration in seconds",
        &["path"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 3.0, 5.0]
    ).expect("metric can be created");
}

/// Generate metrics output in Prometheus text format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
