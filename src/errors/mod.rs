//! Error handling module for the SheetGenie backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.
//! Nothing here is retried automatically: every failure propagates verbatim to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const SERVICE_ERROR: &str = "SERVICE_ERROR";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const COLUMN_NOT_FOUND: &str = "COLUMN_NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Which outbound service produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// The chat-completion service.
    Completion,
    /// The tabular-document service.
    Document,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Completion => "completion service",
            ServiceKind::Document => "document service",
        }
    }
}

/// Pipeline stage attribution. Every failure surfaced to a user names the
/// stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Verify,
    SchemaGeneration,
    DataGeneration,
    ColumnSync,
    RowSync,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Verify => "verify",
            Stage::SchemaGeneration => "schema generation",
            Stage::DataGeneration => "data generation",
            Stage::ColumnSync => "column sync",
            Stage::RowSync => "row sync",
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Transport or HTTP failure talking to an outbound service. `status` is
    /// `None` when the service was unreachable (no HTTP response at all).
    Service {
        service: ServiceKind,
        status: Option<u16>,
        message: String,
    },
    /// The model response was not parseable structured data. Carries the raw
    /// text for diagnosis.
    Parse { message: String, raw: String },
    /// Parsed data violated the schema contract.
    Validation(String),
    /// Column title lookup miss against live document state.
    ColumnNotFound(String),
    /// Malformed inbound request.
    BadRequest(String),
}

impl AppError {
    /// Build a `Service` error from a reqwest failure, preserving the HTTP
    /// status when one was received.
    pub fn from_reqwest(service: ServiceKind, err: reqwest::Error) -> Self {
        AppError::Service {
            service,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Build a `Service` error from a non-2xx upstream response body.
    pub fn upstream_status(service: ServiceKind, status: u16, body: String) -> Self {
        AppError::Service {
            service,
            status: Some(status),
            message: body,
        }
    }

    /// Whether a caller could reasonably retry this failure. A `Service`
    /// error is retryable when the service was unreachable or answered 5xx;
    /// a 4xx means the request itself was bad. Surfaced to callers only,
    /// never acted on internally.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Service { status, .. } => match status {
                None => true,
                Some(code) => *code >= 500,
            },
            _ => false,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Service { .. } => StatusCode::BAD_GATEWAY,
            AppError::Parse { .. } => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ColumnNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Service { .. } => codes::SERVICE_ERROR,
            AppError::Parse { .. } => codes::PARSE_ERROR,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::ColumnNotFound(_) => codes::COLUMN_NOT_FOUND,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Service {
                service,
                status,
                message,
            } => match status {
                Some(code) => format!("{} returned HTTP {}: {}", service.as_str(), code, message),
                None => format!("{} unreachable: {}", service.as_str(), message),
            },
            AppError::Parse { message, raw } => format!("{} (raw response: {})", message, raw),
            AppError::Validation(msg) => msg.clone(),
            AppError::ColumnNotFound(title) => format!("Column '{}' not found in the sheet", title),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// An `AppError` tagged with the pipeline stage that produced it.
#[derive(Debug)]
pub struct StageError {
    pub stage: Stage,
    pub error: AppError,
}

impl StageError {
    pub fn new(stage: Stage, error: AppError) -> Self {
        Self { stage, error }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage.as_str(), self.error)
    }
}

impl std::error::Error for StageError {}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &AppError, stage: Option<Stage>) -> Self {
        Self {
            success: false,
            error: error.message(),
            code: error.error_code().to_string(),
            stage: stage.map(|s| s.as_str().to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self, None);
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for StageError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, Some(self.stage));
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let unreachable = AppError::Service {
            service: ServiceKind::Completion,
            status: None,
            message: "connection refused".to_string(),
        };
        assert!(unreachable.is_retryable());

        let server_side = AppError::upstream_status(ServiceKind::Document, 503, "busy".into());
        assert!(server_side.is_retryable());

        let client_side = AppError::upstream_status(ServiceKind::Document, 401, "bad key".into());
        assert!(!client_side.is_retryable());

        let parse = AppError::Parse {
            message: "not JSON".to_string(),
            raw: "oops".to_string(),
        };
        assert!(!parse.is_retryable());
    }

    #[test]
    fn test_stage_error_display() {
        let err = StageError::new(
            Stage::RowSync,
            AppError::ColumnNotFound("Owner".to_string()),
        );
        let rendered = err.to_string();
        assert!(rendered.starts_with("row sync failed"));
        assert!(rendered.contains("Owner"));
    }
}
