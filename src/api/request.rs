//! Request types for the Freight Quote Engine API.
//!
//! The `/quote` endpoint accepts form-style input: every weight field may be
//! a JSON number, a numeric string, blank or missing. [`QuoteForm`] applies
//! the coercion rules and produces a validated [`QuoteRequest`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::models::{QuoteMethod, QuoteRequest};

/// Request body for the `/quote` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteForm {
    /// The origin country as entered.
    pub country: String,
    /// The quote method, e.g. "per_piece" or "Entire Shipment".
    pub method: String,
    /// The weight of one piece in grams (per-piece quotes).
    #[serde(default, alias = "piece_weight")]
    pub piece_weight_grams: Value,
    /// The quantities to quote (per-piece quotes).
    #[serde(default)]
    pub quantities: Vec<Value>,
    /// The gross weight of the shipment in kilograms (gross weight quotes).
    #[serde(default, alias = "gross_weight")]
    pub gross_weight_kg: Value,
}

impl QuoteForm {
    /// Converts the form into a quote request.
    ///
    /// Quantities that are blank or not numeric count as zero. The primary
    /// weight for the chosen method must be numeric; fields of the other
    /// method are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] for an unknown method or a
    /// missing, blank or non-numeric primary weight.
    pub fn into_request(self) -> EngineResult<QuoteRequest> {
        let method = QuoteMethod::from_str(&self.method)
            .map_err(|message| EngineError::invalid_input("method", message))?;

        match method {
            QuoteMethod::PerPiece => {
                let piece_weight_grams =
                    primary_weight(&self.piece_weight_grams, "piece_weight_grams")?;
                let quantities = self
                    .quantities
                    .iter()
                    .map(|quantity| coerce_numeric(quantity).unwrap_or(Decimal::ZERO))
                    .collect();

                Ok(QuoteRequest::per_piece(self.country, piece_weight_grams, quantities))
            }
            QuoteMethod::GrossWeight => {
                let gross_weight_kg = primary_weight(&self.gross_weight_kg, "gross_weight_kg")?;
                Ok(QuoteRequest::gross_weight(self.country, gross_weight_kg))
            }
        }
    }
}

impl TryFrom<QuoteForm> for QuoteRequest {
    type Error = EngineError;

    fn try_from(form: QuoteForm) -> EngineResult<Self> {
        form.into_request()
    }
}

fn primary_weight(value: &Value, field: &str) -> EngineResult<Decimal> {
    match value {
        Value::Null => Err(EngineError::invalid_input(field, "is required")),
        Value::String(s) if s.trim().is_empty() => {
            Err(EngineError::invalid_input(field, "is required"))
        }
        other => coerce_numeric(other)
            .ok_or_else(|| EngineError::invalid_input(field, format!("{} is not a number", other))),
    }
}

/// Reads a decimal from a JSON number or a numeric string.
///
/// Returns `None` for anything else, including blank strings.
pub fn coerce_numeric(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let text = s.trim();
            Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .ok()
        }
        _ => None,
    }
}
