use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the underwriting core.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub ledger: LedgerConfig,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("UNDERWRITING_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url =
            env::var("SCORING_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidScoringUrl { value: base_url });
        }

        let timeout_secs = env::var("SCORING_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let page_limit = env::var("LEDGER_PAGE_LIMIT")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidPageLimit)?;
        if page_limit == 0 {
            return Err(ConfigError::InvalidPageLimit);
        }

        let log_level =
            env::var("UNDERWRITING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            ledger: LedgerConfig { page_limit },
            scoring: ScoringConfig {
                base_url,
                timeout_secs,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for the ledger façade consumed by this crate.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Fixed window used for every `list_documents` call.
    pub page_limit: u64,
}

/// Settings for the external scoring service client.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout,
    InvalidPageLimit,
    InvalidScoringUrl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout => {
                write!(f, "SCORING_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidPageLimit => {
                write!(f, "LEDGER_PAGE_LIMIT must be a positive integer")
            }
            ConfigError::InvalidScoringUrl { value } => {
                write!(f, "SCORING_BASE_URL '{}' must be an http(s) URL", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
