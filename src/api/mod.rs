//! HTTP API module for the Freight Quote Engine.
//!
//! This module provides the REST API endpoints for quoting shipments and
//! listing the origin countries the loaded rate sheet supports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{QuoteForm, coerce_numeric};
pub use response::{ApiError, ApiErrorResponse, CountriesResponse, CountryEntry, HealthResponse};
pub use state::AppState;
