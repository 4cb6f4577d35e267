use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use fraud_check::{handlers, Settings};
use risk_engine::{AuditLogger, FraudChecker};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting Fraud Check service...");

    // Load configuration
    let settings = Settings::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    // Audit backend is chosen once for the process lifetime
    let audit = match AuditLogger::connect(&settings.audit).await {
        Ok(audit) => audit,
        Err(e) => {
            error!("Failed to initialize audit backend: {}", e);
            return Err(anyhow::Error::new(e).context("Audit backend not accessible"));
        }
    };
    info!("Audit backend initialized: {}", audit.backend_name());

    let checker = FraudChecker::from_config(&settings.engine(), audit)
        .context("Invalid pipeline configuration")?;
    let checker = web::Data::new(checker);

    info!("Fraud pipeline initialized successfully");

    let server_config = settings.server.clone();

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(checker.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await?;

    Ok(())
}
