//! Error types for the Freight Quote Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can abort a rate-table load or a quote.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Zone;

/// The main error type for the Freight Quote Engine.
///
/// The first three variants form the rate-load family: they can only be
/// produced while the rate source is being read and validated, and they are
/// fatal to startup. The remaining variants reject a single quote and leave
/// the loaded tables untouched.
///
/// # Example
///
/// ```
/// use freight_quote::error::EngineError;
///
/// let error = EngineError::UnsupportedCountry {
///     country: "France".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported country: France");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rate source file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A rate source file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The rate grid parsed but violates the table invariants.
    #[error("Malformed rate table: {message}")]
    MalformedRateTable {
        /// A description of the violated invariant.
        message: String,
    },

    /// The requested origin country has no zone mapping.
    #[error("Unsupported country: {country}")]
    UnsupportedCountry {
        /// The country as it was supplied.
        country: String,
    },

    /// A primary request input was missing, non-numeric or out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A weight or amount grew past what a decimal can represent.
    #[error("Weight out of range: {message}")]
    WeightOutOfRange {
        /// The calculation that overflowed.
        message: String,
    },

    /// A billing weight inside the flat-rate range matched no breakpoint.
    #[error("No rate breakpoint for billing weight {weight} kg in zone {zone}")]
    RateLookup {
        /// The billing weight that was looked up.
        weight: Decimal,
        /// The zone whose column was queried.
        zone: Zone,
    },
}

impl EngineError {
    /// Returns true for errors raised while loading the rate source.
    pub fn is_rate_load_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::MalformedRateTable { .. }
        )
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        EngineError::MalformedRateTable {
            message: message.into(),
        }
    }

    pub(crate) fn out_of_range(message: impl Into<String>) -> Self {
        EngineError::WeightOutOfRange {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
