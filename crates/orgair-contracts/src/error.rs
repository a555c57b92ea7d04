use crate::config::ConfigError;
use crate::contracts::{ContractError, UnknownEntity, ValidationErrors};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Entity(UnknownEntity),
    Validation(ValidationErrors),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::Entity(err) => write!(f, "{}", err),
            AppError::Validation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Entity(err) => Some(err),
            AppError::Validation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<UnknownEntity> for AppError {
    fn from(value: UnknownEntity) -> Self {
        Self::Entity(value)
    }
}

impl From<ContractError> for AppError {
    fn from(value: ContractError) -> Self {
        match value {
            ContractError::Invalid(errors) => Self::Validation(errors),
            ContractError::Serialize(err) => Self::Json(err),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::EntityKind;
    use serde_json::json;

    #[test]
    fn contract_errors_map_onto_their_own_variants() {
        let invalid = EntityKind::DimensionScoreInput
            .validate(&json!({"dimension": "talent", "score": 101}))
            .expect_err("score above range");
        assert!(matches!(AppError::from(invalid), AppError::Validation(_)));

        let broken = serde_json::from_str::<serde_json::Value>("[").expect_err("truncated");
        let serialize = ContractError::Serialize(broken);
        assert!(matches!(AppError::from(serialize), AppError::Json(_)));
    }
}
