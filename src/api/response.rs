//! Response types for the rate engine API.
//!
//! This module defines the success bodies and the error response structures
//! and error handling for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{MatchKind, RateResolution, TableSummary};

/// Body of a successful `GET /rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResponse {
    /// The requested FAT value.
    pub fat: Decimal,
    /// The requested SNF value.
    pub snf: Decimal,
    /// The resolved rate.
    pub rate: Decimal,
    /// The FAT axis value the rate was read from.
    pub matched_fat: Decimal,
    /// The SNF axis value the rate was read from.
    pub matched_snf: Decimal,
    /// How the FAT value was matched.
    pub fat_match: MatchKind,
    /// How the SNF value was matched.
    pub snf_match: MatchKind,
    /// Version of the table that answered.
    pub table_version: u64,
}

impl From<RateResolution> for RateResponse {
    fn from(resolution: RateResolution) -> Self {
        Self {
            fat: resolution.fat.requested,
            snf: resolution.snf.requested,
            rate: resolution.rate,
            matched_fat: resolution.fat.matched,
            matched_snf: resolution.snf.matched,
            fat_match: resolution.fat.kind,
            snf_match: resolution.snf.kind,
            table_version: resolution.table_version,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" when a non-empty table is in service, "degraded" otherwise.
    pub status: String,
    /// The table in service.
    pub table: TableSummary,
}

/// API error response structure.
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

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
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
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::Load(_) => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "LOAD_ERROR",
                    message,
                    "The rate chart was not reloaded; the previous table remains in service",
                ),
            },
            EngineError::InvalidInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!("Field '{}' must be a non-negative number", field),
                ),
            },
            EngineError::RateUnavailable { .. } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "RATE_UNAVAILABLE",
                    message,
                    "No rate chart with data is loaded; reload the chart and retry",
                ),
            },
            EngineError::CalculationError { message: details } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", details),
            },
        }
    }
}
