//! Quote request model.
//!
//! A [`QuoteRequest`] is the validated, immutable input to the quote engine.
//! The two weight-input shapes are variants of [`WeightInput`], so a request
//! can never carry a gross weight and piece quantities at the same time.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The maximum number of quantity slots quoted in one per-piece request.
pub const MAX_QUANTITY_SLOTS: usize = 5;

/// The basis on which a shipment is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteMethod {
    /// The weight of one piece times each requested quantity.
    PerPiece,
    /// The gross weight of the entire shipment.
    GrossWeight,
}

impl QuoteMethod {
    /// The snake_case identifier of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteMethod::PerPiece => "per_piece",
            QuoteMethod::GrossWeight => "gross_weight",
        }
    }
}

impl fmt::Display for QuoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteMethod {
    type Err = String;

    /// Accepts the snake_case identifiers as well as the form labels
    /// "Per Piece" and "Entire Shipment".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "per_piece" => Ok(QuoteMethod::PerPiece),
            "gross_weight" | "entire_shipment" => Ok(QuoteMethod::GrossWeight),
            _ => Err(format!("unknown quote method '{}'", s)),
        }
    }
}

/// The weight input of a quote request, shaped by the quote method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WeightInput {
    /// Quote each quantity of identical pieces independently.
    PerPiece {
        /// The weight of a single piece in grams.
        piece_weight_grams: Decimal,
        /// Up to [`MAX_QUANTITY_SLOTS`] quantities; zero means "not requested".
        quantities: Vec<Decimal>,
    },
    /// Quote the shipment as a whole.
    GrossWeight {
        /// The gross weight of the shipment in kilograms.
        gross_weight_kg: Decimal,
    },
}

/// A request for a freight quote.
///
/// # Example
///
/// ```
/// use freight_quote::models::{QuoteMethod, QuoteRequest};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let request = QuoteRequest::gross_weight("China", Decimal::from_str("63.2").unwrap());
/// assert_eq!(request.method(), QuoteMethod::GrossWeight);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// The origin country as entered by the user.
    pub country: String,
    /// The weight input.
    #[serde(flatten)]
    pub input: WeightInput,
}

impl QuoteRequest {
    /// Creates a per-piece request.
    pub fn per_piece(
        country: impl Into<String>,
        piece_weight_grams: Decimal,
        quantities: Vec<Decimal>,
    ) -> Self {
        Self {
            country: country.into(),
            input: WeightInput::PerPiece {
                piece_weight_grams,
                quantities,
            },
        }
    }

    /// Creates a gross-weight request.
    pub fn gross_weight(country: impl Into<String>, gross_weight_kg: Decimal) -> Self {
        Self {
            country: country.into(),
            input: WeightInput::GrossWeight { gross_weight_kg },
        }
    }

    /// Returns the quote method implied by the weight input.
    pub fn method(&self) -> QuoteMethod {
        match self.input {
            WeightInput::PerPiece { .. } => QuoteMethod::PerPiece,
            WeightInput::GrossWeight { .. } => QuoteMethod::GrossWeight,
        }
    }
}
