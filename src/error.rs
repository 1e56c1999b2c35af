use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("{message}")]
    Transport {
        message: String,
        status: Option<u16>,
        correlation_id: Option<String>,
    },

    #[error("record not found")]
    NotFound,

    #[error("report export failed: {message}")]
    Export { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn transport(message: impl Into<String>, correlation_id: Option<&str>) -> Self {
        let message = message.into();
        match correlation_id {
            Some(id) => warn!(target: "app::api", correlation_id = %id, %message, "transport error"),
            None => warn!(target: "app::api", %message, "transport error"),
        }
        AppError::Transport {
            message,
            status: None,
            correlation_id: correlation_id.map(|value| value.to_string()),
        }
    }

    pub fn transport_with_status(
        message: impl Into<String>,
        status: u16,
        correlation_id: Option<&str>,
    ) -> Self {
        let message = message.into();
        match correlation_id {
            Some(id) => {
                warn!(target: "app::api", correlation_id = %id, status, %message, "transport error")
            }
            None => warn!(target: "app::api", status, %message, "transport error"),
        }
        AppError::Transport {
            message,
            status: Some(status),
            correlation_id: correlation_id.map(|value| value.to_string()),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::report", %message, "export error");
        AppError::Export { message }
    }

    pub fn not_found() -> Self {
        warn!(target: "app::api", "resource not found");
        AppError::NotFound
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }

    pub fn transport_status(&self) -> Option<u16> {
        match self {
            AppError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn transport_correlation_id(&self) -> Option<&str> {
        match self {
            AppError::Transport { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    pub fn validation_details(&self) -> Option<&JsonValue> {
        match self {
            AppError::Validation { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let status = error.status().map(|code| code.as_u16());
        warn!(target: "app::api", error = ?error, "http client error");
        AppError::Transport {
            message: error.to_string(),
            status,
            correlation_id: None,
        }
    }
}
