//! Response types for the payroll engine API.
//!
//! Successful responses are plain JSON documents. Failures carry an
//! [`ApiError`] body with a stable code for programmatic handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::DailyExportRow;
use crate::error::EngineError;
use crate::models::{EmployeeName, Punch, SummaryRow, SummaryTotals};

/// Body of `POST /punches/extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Extracted punches in table order.
    pub punches: Vec<Punch>,
    /// Distinct employees, sorted.
    pub employees: Vec<EmployeeName>,
}

/// Body of `POST /reports/daily`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportResponse {
    /// One rounded row per employee and day.
    pub rows: Vec<DailyExportRow>,
}

/// Body of `POST /reports/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReportResponse {
    /// One row per employee.
    pub rows: Vec<SummaryRow>,
    /// Column totals.
    pub totals: SummaryTotals,
}

/// API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// A request body that is well-formed JSON but lacks a required field.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// A request body that could not be read as the expected JSON.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// A request without a JSON content type.
    pub fn missing_content_type() -> Self {
        Self::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        )
    }
}

/// API error with its HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::SessionFormat { .. } => {
                Self::bad_request(ApiError::new("SESSION_FORMAT", message))
            }
            EngineError::UnsupportedSessionVersion { .. } => Self::bad_request(ApiError::with_details(
                "UNSUPPORTED_SESSION_VERSION",
                message,
                "The session was saved by a newer release",
            )),
            EngineError::NoPunchesFound => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "NO_DATA_FOUND",
                    message,
                    "No clock-in/clock-out table was recognised in the report",
                ),
            },
            EngineError::InvalidMonthKey { .. } => {
                Self::bad_request(ApiError::new("INVALID_MONTH", message))
            }
        }
    }
}
