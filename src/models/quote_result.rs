//! Quote result models for the Freight Quote Engine.
//!
//! This module contains the [`QuoteResult`] type and its associated structures
//! that capture all outputs of a quote, including the per-slot quote lines and
//! the audit trace of every pipeline decision.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{QuoteMethod, Zone};

/// How a buffered weight was priced.
///
/// # Example
///
/// ```
/// use freight_quote::models::RateBasis;
/// use rust_decimal::Decimal;
///
/// let basis = RateBasis::Multiplier {
///     band_up_to_kg: Some(Decimal::from(150)),
///     multiplier: Decimal::new(895, 2),
/// };
/// assert!(!basis.is_flat());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateBasis {
    /// The weight was at or below zero and priced at nothing.
    Zero,
    /// The flat price of an exact breakpoint row.
    Flat {
        /// The breakpoint that matched.
        breakpoint_kg: Decimal,
    },
    /// The weight times the per-kg multiplier of a band.
    Multiplier {
        /// The inclusive upper limit of the band, `None` when unbounded.
        band_up_to_kg: Option<Decimal>,
        /// The per-kg multiplier of the band for the zone.
        multiplier: Decimal,
    },
}

impl RateBasis {
    /// Returns true when the price came from a breakpoint row.
    pub fn is_flat(&self) -> bool {
        matches!(self, RateBasis::Flat { .. })
    }
}

/// One priced weight: a per-piece slot or the whole shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    /// The 1-based slot number (always 1 for gross-weight quotes).
    pub slot: usize,
    /// The requested quantity, for per-piece quotes.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quantity: Option<Decimal>,
    /// The weight before rounding, in kilograms.
    pub raw_weight_kg: Decimal,
    /// The weight rounded up to the half-kilogram billing unit.
    pub billing_weight_kg: Decimal,
    /// The safety buffer added to the billing weight.
    pub buffer_kg: Decimal,
    /// The billing weight plus the buffer; this is what gets priced.
    pub buffered_weight_kg: Decimal,
    /// How the buffered weight was priced.
    pub basis: RateBasis,
    /// The estimated cost.
    pub amount: Decimal,
}

/// The priced lines of a quote, shaped by the quote method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum QuoteOutcome {
    /// Positionally aligned with the requested quantities; slots whose
    /// quantity was zero are `None`.
    PerPiece {
        /// One entry per requested quantity slot.
        slots: Vec<Option<QuoteLine>>,
    },
    /// A single line for the whole shipment.
    GrossWeight {
        /// The shipment line.
        line: QuoteLine,
    },
}

/// A single step in the audit trace recording a pipeline decision.
///
/// Each step captures the input, output, and reasoning for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the stage that was applied.
    pub rule_id: String,
    /// The human-readable name of the stage.
    pub rule_name: String,
    /// The quote slot this step belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub slot: Option<usize>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a quote.
///
/// # Example
///
/// ```
/// use freight_quote::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of pipeline steps.
    pub steps: Vec<AuditStep>,
    /// The total quote duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a freight quote.
///
/// The result has no persisted identity; `quote_id` and `timestamp` exist
/// only to correlate log lines and responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Unique identifier for this quote.
    pub quote_id: Uuid,
    /// When the quote was computed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that computed the quote.
    pub engine_version: String,
    /// The origin country as requested.
    pub country: String,
    /// The zone the country resolved to.
    pub zone: Zone,
    /// The priced lines.
    pub outcome: QuoteOutcome,
    /// The audit trace.
    pub audit_trace: AuditTrace,
}

impl QuoteResult {
    /// Returns the quote method of the outcome.
    pub fn method(&self) -> QuoteMethod {
        match self.outcome {
            QuoteOutcome::PerPiece { .. } => QuoteMethod::PerPiece,
            QuoteOutcome::GrossWeight { .. } => QuoteMethod::GrossWeight,
        }
    }

    /// Returns one amount per slot, `None` where the slot was not requested.
    pub fn amounts(&self) -> Vec<Option<Decimal>> {
        match &self.outcome {
            QuoteOutcome::PerPiece { slots } => slots
                .iter()
                .map(|slot| slot.as_ref().map(|line| line.amount))
                .collect(),
            QuoteOutcome::GrossWeight { line } => vec![Some(line.amount)],
        }
    }

    /// Returns the lines that were actually priced, in slot order.
    pub fn lines(&self) -> Vec<&QuoteLine> {
        match &self.outcome {
            QuoteOutcome::PerPiece { slots } => slots.iter().flatten().collect(),
            QuoteOutcome::GrossWeight { line } => vec![line],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(slot: usize, amount: i64) -> QuoteLine {
        QuoteLine {
            slot,
            quantity: Some(Decimal::from(10)),
            raw_weight_kg: Decimal::from(5),
            billing_weight_kg: Decimal::from(5),
            buffer_kg: Decimal::ONE,
            buffered_weight_kg: Decimal::from(6),
            basis: RateBasis::Flat {
                breakpoint_kg: Decimal::from(6),
            },
            amount: Decimal::from(amount),
        }
    }

    fn result(outcome: QuoteOutcome) -> QuoteResult {
        QuoteResult {
            quote_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            country: "China".to_string(),
            zone: Zone::China,
            outcome,
            audit_trace: AuditTrace {
                steps: vec![],
                duration_us: 0,
            },
        }
    }

    #[test]
    fn test_per_piece_amounts_keep_absent_slots() {
        let quote = result(QuoteOutcome::PerPiece {
            slots: vec![Some(line(1, 40)), None, Some(line(3, 25))],
        });

        assert_eq!(quote.method(), QuoteMethod::PerPiece);
        assert_eq!(
            quote.amounts(),
            vec![Some(Decimal::from(40)), None, Some(Decimal::from(25))]
        );
        assert_eq!(quote.lines().len(), 2);
    }

    #[test]
    fn test_gross_weight_has_single_amount() {
        let quote = result(QuoteOutcome::GrossWeight { line: line(1, 99) });

        assert_eq!(quote.method(), QuoteMethod::GrossWeight);
        assert_eq!(quote.amounts(), vec![Some(Decimal::from(99))]);
    }

    #[test]
    fn test_absent_slot_serializes_as_null() {
        let quote = result(QuoteOutcome::PerPiece {
            slots: vec![Some(line(1, 40)), None],
        });
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["outcome"]["method"], "per_piece");
        assert!(json["outcome"]["slots"][1].is_null());
        assert_eq!(json["outcome"]["slots"][0]["amount"], "40");
    }

    #[test]
    fn test_quote_result_round_trips_through_json() {
        let quote = result(QuoteOutcome::GrossWeight { line: line(1, 99) });
        let json = serde_json::to_string(&quote).unwrap();
        let back: QuoteResult = serde_json::from_str(&json).unwrap();

        assert_eq!(back, quote);
    }
}
