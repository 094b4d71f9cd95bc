use crate::catalog::CatalogLoadError;
use crate::config::ConfigError;
use crate::eligibility::EligibilityError;
use crate::history::HistoryImportError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Everything the command-line front end can fail with.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Catalog(CatalogLoadError),
    History(HistoryImportError),
    Eligibility(EligibilityError),
    Json(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::History(err) => write!(f, "history error: {}", err),
            AppError::Eligibility(EligibilityError::Validation(err)) => write!(f, "{}", err),
            AppError::Eligibility(EligibilityError::Catalog(err)) => write!(f, "{}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::History(err) => Some(err),
            AppError::Eligibility(err) => Some(err),
            AppError::Json(err) => Some(err),
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

impl From<CatalogLoadError> for AppError {
    fn from(value: CatalogLoadError) -> Self {
        Self::Catalog(value)
    }
}

impl From<HistoryImportError> for AppError {
    fn from(value: HistoryImportError) -> Self {
        Self::History(value)
    }
}

impl From<EligibilityError> for AppError {
    fn from(value: EligibilityError) -> Self {
        Self::Eligibility(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::ValidationError;

    #[test]
    fn validation_messages_reach_the_user_unchanged() {
        let error = AppError::from(EligibilityError::from(ValidationError::MissingUnits));
        assert_eq!(error.to_string(), "Please select at least one unit");
    }

    #[test]
    fn config_errors_are_prefixed() {
        let error = AppError::from(ConfigError::InvalidOutputFormat {
            value: "xml".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "configuration error: ELIGIBILITY_OUTPUT must be 'text' or 'json' (got 'xml')"
        );
    }
}
