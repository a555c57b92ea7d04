use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tooling.
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

/// Top-level configuration for the contract tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub export: ExportConfig,
    pub generator: GeneratorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let schema_dir = env::var("ORGAIR_SCHEMA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("schemas"));
        let version = env::var("ORGAIR_SCHEMA_VERSION").unwrap_or_else(|_| "v1".to_string());
        if version.trim().is_empty() || version.contains(['/', '\\']) {
            return Err(ConfigError::InvalidSchemaVersion(version));
        }

        let seed = match env::var("ORGAIR_SEED") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed(raw))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            export: ExportConfig {
                schema_dir,
                version: version.trim().to_string(),
            },
            generator: GeneratorConfig { seed },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where exported schemas are written.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub schema_dir: PathBuf,
    pub version: String,
}

/// Synthetic data generation controls.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSeed(String),
    InvalidSchemaVersion(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeed(raw) => {
                write!(f, "ORGAIR_SEED must be a valid u64, got '{raw}'")
            }
            ConfigError::InvalidSchemaVersion(raw) => write!(
                f,
                "ORGAIR_SCHEMA_VERSION must be a non-empty path segment, got '{raw}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
