//! Response types for the Freight Quote Engine API.
//!
//! This module defines the error response structures, the mapping from
//! [`EngineError`] to HTTP status codes, and the bodies of the read-only
//! endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::Zone;

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
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Wraps an error body with a 400 status.
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
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::MalformedRateTable { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Malformed rate table", message),
            },
            EngineError::UnsupportedCountry { country } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "UNSUPPORTED_COUNTRY",
                    format!("Unsupported country: {}", country),
                    "GET /countries lists the origin countries that can be quoted",
                ))
            }
            EngineError::InvalidInput { field, message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input '{}': {}", field, message),
                    field,
                ))
            }
            EngineError::WeightOutOfRange { message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "WEIGHT_OUT_OF_RANGE",
                    format!("Weight out of range: {}", message),
                    "Reduce the weight or quantity",
                ))
            }
            error @ EngineError::RateLookup { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "RATE_LOOKUP_FAILED",
                    error.to_string(),
                    "The rate table has no price for this weight",
                ),
            },
        }
    }
}

/// Body of `GET /countries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesResponse {
    /// The carrier whose rates are loaded.
    pub carrier: String,
    /// The rate sheet name.
    pub sheet: String,
    /// The currency of quoted amounts.
    pub currency: String,
    /// The countries that can be quoted.
    pub countries: Vec<CountryEntry>,
}

/// A supported country in [`CountriesResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryEntry {
    /// The country name.
    pub country: String,
    /// The zone that prices the country.
    pub zone: Zone,
    /// The rate sheet column of the zone.
    pub sheet_column: u32,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the server is answering.
    pub status: String,
    /// The crate version serving requests.
    pub engine_version: String,
}
