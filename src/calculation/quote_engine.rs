//! Quote orchestration.
//!
//! The [`QuoteEngine`] runs every requested weight through the same three
//! stages: billing weight rounding, safety buffer, rate resolution. Each
//! per-piece slot is priced on its own; a failure in any slot fails the
//! whole quote.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, MAX_QUANTITY_SLOTS, QuoteLine, QuoteOutcome, QuoteRequest, QuoteResult,
    WeightInput, Zone,
};
use crate::rates::{RateTable, ZoneMap};

use super::billing_weight::calculate_billing_weight;
use super::rate_resolution::resolve_rate;
use super::safety_buffer::calculate_safety_buffer;

const GRAMS_PER_KG: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// A priced weight and the audit steps that produced it.
struct PricedWeight {
    line: QuoteLine,
    steps: Vec<AuditStep>,
}

/// Produces freight quotes from a shared rate table and zone map.
///
/// The engine is cheap to clone and holds no mutable state; every call to
/// [`QuoteEngine::quote`] depends only on the request and the tables.
///
/// # Example
///
/// ```
/// use freight_quote::calculation::QuoteEngine;
/// use freight_quote::config::{BreakpointRow, MultiplierBandRow, RateGrid};
/// use freight_quote::models::QuoteRequest;
/// use freight_quote::rates::{RateTable, ZoneMap};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let cells = |value: Decimal| -> BTreeMap<String, Decimal> {
///     ["china", "taiwan_hong_kong", "thailand"]
///         .into_iter()
///         .map(|zone| (zone.to_string(), value))
///         .collect()
/// };
/// let grid = RateGrid {
///     breakpoints: (1..=140)
///         .map(|half_kgs| BreakpointRow {
///             weight: Decimal::new(half_kgs * 5, 1),
///             prices: cells(Decimal::from(10 + half_kgs)),
///         })
///         .collect(),
///     multiplier_bands: [Some(150), Some(300), Some(999), None]
///         .into_iter()
///         .map(|up_to_kg| MultiplierBandRow {
///             up_to_kg: up_to_kg.map(Decimal::from),
///             multipliers: cells(Decimal::from(9)),
///         })
///         .collect(),
/// };
///
/// let engine = QuoteEngine::new(RateTable::load(&grid)?, ZoneMap::standard());
/// let quote = engine.quote(&QuoteRequest::gross_weight("Thailand", Decimal::from(4)))?;
///
/// // 4 kg + 1 kg buffer = 5 kg, the tenth half-kilogram row.
/// assert_eq!(quote.amounts(), vec![Some(Decimal::from(20))]);
/// # Ok::<(), freight_quote::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    rate_table: Arc<RateTable>,
    zones: Arc<ZoneMap>,
}

impl QuoteEngine {
    /// Creates an engine over a rate table and zone map.
    pub fn new(rate_table: impl Into<Arc<RateTable>>, zones: impl Into<Arc<ZoneMap>>) -> Self {
        Self {
            rate_table: rate_table.into(),
            zones: zones.into(),
        }
    }

    /// Returns the rate table the engine prices against.
    pub fn rate_table(&self) -> &RateTable {
        &self.rate_table
    }

    /// Returns the zone map the engine resolves countries with.
    pub fn zones(&self) -> &ZoneMap {
        &self.zones
    }

    /// Computes a quote.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnsupportedCountry`] if the country has no zone
    /// - [`EngineError::InvalidInput`] if the piece or gross weight is not
    ///   positive, or more than [`MAX_QUANTITY_SLOTS`] quantities are given
    /// - [`EngineError::WeightOutOfRange`] if a slot weight, buffered weight
    ///   or price overflows a decimal
    /// - [`EngineError::RateLookup`] if any priced weight falls between
    ///   breakpoints; no partial quote is returned
    pub fn quote(&self, request: &QuoteRequest) -> EngineResult<QuoteResult> {
        let start_time = Instant::now();

        let zone = self.zones.resolve(&request.country)?;
        let mut steps = vec![zone_step(&request.country, zone)];

        let outcome = match &request.input {
            WeightInput::PerPiece {
                piece_weight_grams,
                quantities,
            } => {
                if *piece_weight_grams <= Decimal::ZERO {
                    return Err(EngineError::invalid_input(
                        "piece_weight_grams",
                        format!("must be greater than zero, got {}", piece_weight_grams),
                    ));
                }
                if quantities.len() > MAX_QUANTITY_SLOTS {
                    return Err(EngineError::invalid_input(
                        "quantities",
                        format!(
                            "at most {} quantities can be quoted, got {}",
                            MAX_QUANTITY_SLOTS,
                            quantities.len()
                        ),
                    ));
                }

                let mut slots = Vec::with_capacity(quantities.len());
                for (index, quantity) in quantities.iter().enumerate() {
                    if *quantity <= Decimal::ZERO {
                        slots.push(None);
                        continue;
                    }

                    let slot = index + 1;
                    let raw_weight_kg = quantity
                        .checked_mul(*piece_weight_grams)
                        .map(|grams| grams / GRAMS_PER_KG)
                        .ok_or_else(|| {
                            EngineError::out_of_range(format!(
                                "slot {}: {} x {} g",
                                slot, quantity, piece_weight_grams
                            ))
                        })?;
                    let next_step = next_step_number(&steps);
                    let mut priced = self.price_weight(raw_weight_kg, zone, slot, next_step)?;
                    priced.line.quantity = Some(*quantity);

                    steps.append(&mut priced.steps);
                    slots.push(Some(priced.line));
                }

                QuoteOutcome::PerPiece { slots }
            }
            WeightInput::GrossWeight { gross_weight_kg } => {
                if *gross_weight_kg <= Decimal::ZERO {
                    return Err(EngineError::invalid_input(
                        "gross_weight_kg",
                        format!("must be greater than zero, got {}", gross_weight_kg),
                    ));
                }

                let next_step = next_step_number(&steps);
                let mut priced = self.price_weight(*gross_weight_kg, zone, 1, next_step)?;
                steps.append(&mut priced.steps);

                QuoteOutcome::GrossWeight { line: priced.line }
            }
        };

        let duration_us = start_time.elapsed().as_micros() as u64;

        Ok(QuoteResult {
            quote_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            country: request.country.trim().to_string(),
            zone,
            outcome,
            audit_trace: AuditTrace { steps, duration_us },
        })
    }

    /// Runs one raw weight through rounding, buffering and resolution.
    fn price_weight(
        &self,
        raw_weight_kg: Decimal,
        zone: Zone,
        slot: usize,
        first_step: u32,
    ) -> EngineResult<PricedWeight> {
        let billing = calculate_billing_weight(raw_weight_kg, Some(slot), first_step);
        let buffer =
            calculate_safety_buffer(billing.billing_weight_kg, Some(slot), first_step + 1)?;
        let rate = resolve_rate(
            &self.rate_table,
            buffer.buffered_weight_kg,
            zone,
            Some(slot),
            first_step + 2,
        )?;

        debug!(
            slot,
            zone = %zone,
            raw_weight_kg = %raw_weight_kg,
            billing_weight_kg = %billing.billing_weight_kg,
            buffered_weight_kg = %buffer.buffered_weight_kg,
            amount = %rate.resolution.price,
            "Priced weight"
        );

        Ok(PricedWeight {
            line: QuoteLine {
                slot,
                quantity: None,
                raw_weight_kg: raw_weight_kg.normalize(),
                billing_weight_kg: billing.billing_weight_kg,
                buffer_kg: buffer.buffer_kg,
                buffered_weight_kg: buffer.buffered_weight_kg,
                basis: rate.resolution.basis,
                amount: rate.resolution.price,
            },
            steps: vec![billing.audit_step, buffer.audit_step, rate.audit_step],
        })
    }
}

fn next_step_number(steps: &[AuditStep]) -> u32 {
    steps.last().map_or(1, |step| step.step_number + 1)
}

fn zone_step(country: &str, zone: Zone) -> AuditStep {
    AuditStep {
        step_number: 1,
        rule_id: "zone_resolution".to_string(),
        rule_name: "Zone Resolution".to_string(),
        slot: None,
        input: serde_json::json!({ "country": country.trim() }),
        output: serde_json::json!({
            "zone": zone.as_str(),
            "sheet_column": zone.sheet_column()
        }),
        reasoning: format!(
            "{} is priced from zone {} (rate sheet column {})",
            country.trim(),
            zone,
            zone.sheet_column()
        ),
    }
}
