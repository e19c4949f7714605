//! HTTP request handlers for the Freight Quote Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::format_money;

use super::request::QuoteForm;
use super::response::{ApiError, ApiErrorResponse, CountriesResponse, CountryEntry, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/quote", post(quote_handler))
        .route("/countries", get(countries_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Handler for POST /quote.
///
/// Coerces the form, runs the quote and returns the full result.
async fn quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuoteForm>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing quote request");

    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return error_response(ApiErrorResponse::bad_request(error));
        }
    };

    let result = form
        .into_request()
        .and_then(|request| state.engine().quote(&request));

    match result {
        Ok(quote) => {
            let amounts: Vec<String> = quote
                .amounts()
                .into_iter()
                .map(|amount| amount.map_or_else(|| "-".to_string(), format_money))
                .collect();
            info!(
                correlation_id = %correlation_id,
                quote_id = %quote.quote_id,
                country = %quote.country,
                zone = %quote.zone,
                method = %quote.method(),
                amounts = ?amounts,
                duration_us = quote.audit_trace.duration_us,
                "Quote completed successfully"
            );
            json_response(StatusCode::OK, quote)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Quote failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for GET /countries.
async fn countries_handler(State(state): State<AppState>) -> Response {
    let config = state.config();
    let metadata = config.metadata();

    let countries = config
        .zones()
        .countries()
        .iter()
        .map(|entry| CountryEntry {
            country: entry.country.clone(),
            zone: entry.zone,
            sheet_column: entry.zone.sheet_column(),
        })
        .collect();

    json_response(
        StatusCode::OK,
        CountriesResponse {
            carrier: metadata.carrier.clone(),
            sheet: metadata.sheet.clone(),
            currency: metadata.currency.clone(),
            countries,
        },
    )
}

/// Handler for GET /health.
async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}
