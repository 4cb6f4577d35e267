use config::{ConfigError, Environment};
use risk_engine::config::{AuditConfig, ModelConfig, PipelineConfig, RuleConfig};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            // Server defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", 4)?;

        builder = builder.add_source(
            Environment::with_prefix("FRAUD_CHECK")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("rules.high_risk_countries")
                .try_parsing(true),
        );

        // Legacy variable names
        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        if let Ok(port) = env::var("SERVICE_PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        if let Ok(url) = env::var("MODEL_SERVER_URL") {
            builder = builder.set_override("model.url", url)?;
        }

        if let Ok(db_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("audit.database_url", db_url)?;
        }

        if let Ok(path) = env::var("AUDIT_LOG_PATH") {
            builder = builder.set_override("audit.log_path", path)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Pipeline configuration
    pub fn engine(&self) -> risk_engine::Config {
        risk_engine::Config {
            rules: self.rules.clone(),
            model: self.model.clone(),
            pipeline: self.pipeline.clone(),
            audit: self.audit.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_defaults_without_environment() {
        let settings: Settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")
            .unwrap()
            .set_default("server.port", 9000)
            .unwrap()
            .set_default("server.workers", 1)
            .unwrap()
            .set_override("model.timeout_ms", 1500)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.model.timeout_ms, 1500);
        assert!(settings.model.url.is_none());
        assert_eq!(settings.pipeline.deadline_ms, 5_000);
        assert_eq!(settings.rules.new_account_days, 7);
        assert!(settings.engine().validate().is_ok());
    }

    #[test]
    fn test_from_env_applies_overrides() {
        let vars = [
            ("FRAUD_CHECK__RULES__HIGH_RISK_COUNTRIES", "XX,YY"),
            ("FRAUD_CHECK__RULES__LARGE_AMOUNT", "2000"),
            ("FRAUD_CHECK__PIPELINE__DEADLINE_MS", "8000"),
            ("MODEL_SERVER_URL", "http://model:9000/score"),
            ("DATABASE_URL", "postgres://fraud@db/fraud"),
            ("AUDIT_LOG_PATH", "/var/log/fraud/decisions.log"),
            ("PORT", "9999"),
        ];
        env::remove_var("SERVICE_PORT");
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let settings = Settings::from_env();

        for (key, _) in vars {
            env::remove_var(key);
        }
        let settings = settings.unwrap();

        assert_eq!(settings.server.port, 9999);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(
            settings.rules.high_risk_countries.iter().collect::<Vec<_>>(),
            vec!["XX", "YY"]
        );
        assert_eq!(settings.rules.large_amount, Decimal::from(2000));
        assert_eq!(settings.rules.new_account_days, 7);
        assert_eq!(settings.pipeline.deadline_ms, 8_000);
        assert_eq!(settings.model.url.as_deref(), Some("http://model:9000/score"));
        assert_eq!(
            settings.audit.database_url.as_deref(),
            Some("postgres://fraud@db/fraud")
        );
        assert_eq!(
            settings.audit.log_path,
            std::path::PathBuf::from("/var/log/fraud/decisions.log")
        );
        assert!(settings.engine().validate().is_ok());
    }
}
