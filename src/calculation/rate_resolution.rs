//! Rate resolution step.
//!
//! Prices a buffered weight against the rate table and records how the price
//! was reached.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, RateBasis, Zone};
use crate::rates::{RateResolution, RateTable};

/// The result of pricing a buffered weight, including the audit step.
#[derive(Debug, Clone)]
pub struct RateResolutionResult {
    /// The resolved price and basis.
    pub resolution: RateResolution,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Prices a buffered weight for a zone.
///
/// # Errors
///
/// Propagates [`EngineError::RateLookup`](crate::error::EngineError::RateLookup)
/// when a weight in the flat-rate range matches no breakpoint.
pub fn resolve_rate(
    table: &RateTable,
    buffered_weight_kg: Decimal,
    zone: Zone,
    slot: Option<usize>,
    step_number: u32,
) -> EngineResult<RateResolutionResult> {
    let resolution = table.resolve(buffered_weight_kg, zone)?;
    let price = resolution.price;

    let (basis_output, reasoning) = match &resolution.basis {
        RateBasis::Zero => (
            serde_json::json!({ "kind": "zero" }),
            format!("{} kg has no billable weight", buffered_weight_kg),
        ),
        RateBasis::Flat { breakpoint_kg } => (
            serde_json::json!({
                "kind": "flat",
                "breakpoint_kg": breakpoint_kg.to_string()
            }),
            format!(
                "Flat rate for {} kg from zone {} (column {}): ${}",
                breakpoint_kg,
                zone,
                zone.sheet_column(),
                price
            ),
        ),
        RateBasis::Multiplier {
            band_up_to_kg,
            multiplier,
        } => {
            let band = band_up_to_kg.map_or_else(
                || "unbounded band".to_string(),
                |limit| format!("band up to {} kg", limit),
            );
            (
                serde_json::json!({
                    "kind": "multiplier",
                    "band_up_to_kg": band_up_to_kg.map(|limit| limit.to_string()),
                    "multiplier": multiplier.to_string()
                }),
                format!(
                    "{} kg x {} per kg ({}, zone {}) = ${}",
                    buffered_weight_kg, multiplier, band, zone, price
                ),
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_resolution".to_string(),
        rule_name: "Rate Resolution".to_string(),
        slot,
        input: serde_json::json!({
            "buffered_weight_kg": buffered_weight_kg.to_string(),
            "zone": zone.as_str()
        }),
        output: serde_json::json!({
            "basis": basis_output,
            "price": price.to_string()
        }),
        reasoning,
    };

    Ok(RateResolutionResult {
        resolution,
        audit_step,
    })
}
