//! Billing weight rounding.
//!
//! Carriers bill in half-kilogram units. Any positive remainder below half a
//! kilogram bills as 0.5 kg and any remainder of half a kilogram or more bills
//! as a full kilogram; a whole-kilogram weight is billed as is.

use rust_decimal::Decimal;

use crate::models::AuditStep;

const HALF_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// The result of rounding a raw weight, including the audit step.
#[derive(Debug, Clone)]
pub struct BillingWeightResult {
    /// The billing weight in kilograms.
    pub billing_weight_kg: Decimal,
    /// The audit step recording this rounding.
    pub audit_step: AuditStep,
}

/// Rounds a raw weight up to the half-kilogram billing unit.
///
/// This is not round-half-up: with `frac = raw - floor(raw)`,
/// - `frac == 0` keeps the floor,
/// - `0 < frac < 0.5` bills `floor + 0.5`,
/// - `frac >= 0.5` bills `floor + 1`.
///
/// # Examples
///
/// ```
/// use freight_quote::calculation::round_to_billing_unit;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
///
/// assert_eq!(round_to_billing_unit(dec("10.0")), dec("10"));
/// assert_eq!(round_to_billing_unit(dec("10.01")), dec("10.5"));
/// assert_eq!(round_to_billing_unit(dec("10.5")), dec("11"));
/// assert_eq!(round_to_billing_unit(dec("10.6")), dec("11"));
/// ```
pub fn round_to_billing_unit(raw_weight_kg: Decimal) -> Decimal {
    let whole = raw_weight_kg.floor();
    let frac = raw_weight_kg - whole;

    let billed_fraction = if frac.is_zero() {
        Decimal::ZERO
    } else if frac < HALF_KG {
        HALF_KG
    } else {
        Decimal::ONE
    };

    (whole + billed_fraction).normalize()
}

/// Rounds a raw weight and records the decision as an audit step.
///
/// # Arguments
///
/// * `raw_weight_kg` - The weight before rounding
/// * `slot` - The quote slot the weight belongs to, if any
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_billing_weight(
    raw_weight_kg: Decimal,
    slot: Option<usize>,
    step_number: u32,
) -> BillingWeightResult {
    let billing_weight_kg = round_to_billing_unit(raw_weight_kg);

    let reasoning = if billing_weight_kg == raw_weight_kg {
        format!(
            "{} kg is already a whole billing unit",
            raw_weight_kg.normalize()
        )
    } else {
        format!(
            "{} kg rounded up to the next half kilogram: {} kg",
            raw_weight_kg.normalize(),
            billing_weight_kg
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "billing_weight_rounding".to_string(),
        rule_name: "Billing Weight Rounding".to_string(),
        slot,
        input: serde_json::json!({
            "raw_weight_kg": raw_weight_kg.normalize().to_string()
        }),
        output: serde_json::json!({
            "billing_weight_kg": billing_weight_kg.to_string()
        }),
        reasoning,
    };

    BillingWeightResult {
        billing_weight_kg,
        audit_step,
    }
}
