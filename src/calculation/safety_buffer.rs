//! Safety buffer application.
//!
//! A quote is an estimate made before the goods are packed and weighed, so a
//! buffer is added to every billing weight to absorb packaging and scale
//! variance. The buffer grows with the weight in fixed tiers.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// Buffer tiers as `(weight ceiling, buffer)` pairs in ascending order.
///
/// A billing weight at or below a ceiling receives that tier's buffer.
pub const BUFFER_TIERS: [(Decimal, Decimal); 10] = [
    (kg(0, 0), kg(0, 0)),
    (kg(5, 0), kg(1, 0)),
    (kg(10, 0), kg(2, 0)),
    (kg(25, 0), kg(25, 1)),
    (kg(50, 0), kg(5, 0)),
    (kg(75, 0), kg(8, 0)),
    (kg(100, 0), kg(12, 0)),
    (kg(150, 0), kg(17, 0)),
    (kg(200, 0), kg(20, 0)),
    (kg(500, 0), kg(35, 0)),
];

/// The buffer for billing weights above the last tier ceiling.
pub const OVERFLOW_BUFFER_KG: Decimal = kg(40, 0);

const fn kg(value: u32, scale: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, scale)
}

/// The result of buffering a billing weight, including the audit step.
#[derive(Debug, Clone)]
pub struct SafetyBufferResult {
    /// The buffer that was added.
    pub buffer_kg: Decimal,
    /// The billing weight plus the buffer.
    pub buffered_weight_kg: Decimal,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Returns the buffer for a billing weight.
///
/// The first tier whose ceiling is at or above the weight decides; weights
/// above 500 kg get [`OVERFLOW_BUFFER_KG`].
pub fn buffer_for(billing_weight_kg: Decimal) -> Decimal {
    tier_for(billing_weight_kg).map_or(OVERFLOW_BUFFER_KG, |(_, buffer)| buffer)
}

fn tier_for(billing_weight_kg: Decimal) -> Option<(Decimal, Decimal)> {
    BUFFER_TIERS
        .iter()
        .find(|(ceiling, _)| billing_weight_kg <= *ceiling)
        .copied()
}

/// Adds the tiered safety buffer to a billing weight.
///
/// # Errors
///
/// Returns [`EngineError::WeightOutOfRange`] if the sum overflows.
///
/// # Examples
///
/// ```
/// use freight_quote::calculation::apply_buffer;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
///
/// assert_eq!(apply_buffer(dec("4"))?, dec("5"));
/// assert_eq!(apply_buffer(dec("5"))?, dec("6"));
/// assert_eq!(apply_buffer(dec("63.5"))?, dec("71.5"));
/// assert_eq!(apply_buffer(dec("600"))?, dec("640"));
/// assert!(apply_buffer(Decimal::MAX).is_err());
/// # Ok::<(), freight_quote::error::EngineError>(())
/// ```
pub fn apply_buffer(billing_weight_kg: Decimal) -> EngineResult<Decimal> {
    add_buffer(billing_weight_kg, buffer_for(billing_weight_kg))
}

fn add_buffer(billing_weight_kg: Decimal, buffer_kg: Decimal) -> EngineResult<Decimal> {
    billing_weight_kg.checked_add(buffer_kg).ok_or_else(|| {
        EngineError::out_of_range(format!(
            "{} kg + {} kg buffer",
            billing_weight_kg, buffer_kg
        ))
    })
}

/// Buffers a billing weight and records the decision as an audit step.
///
/// # Arguments
///
/// * `billing_weight_kg` - The rounded billing weight
/// * `slot` - The quote slot the weight belongs to, if any
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`EngineError::WeightOutOfRange`] if the buffered weight overflows.
pub fn calculate_safety_buffer(
    billing_weight_kg: Decimal,
    slot: Option<usize>,
    step_number: u32,
) -> EngineResult<SafetyBufferResult> {
    let tier = tier_for(billing_weight_kg);
    let buffer_kg = tier.map_or(OVERFLOW_BUFFER_KG, |(_, buffer)| buffer);
    let buffered_weight_kg = add_buffer(billing_weight_kg, buffer_kg)?;

    let (tier_ceiling, reasoning) = match tier {
        Some((ceiling, _)) => (
            serde_json::Value::String(ceiling.to_string()),
            format!(
                "{} kg is within the {} kg tier: {} kg + {} kg buffer = {} kg",
                billing_weight_kg,
                ceiling,
                billing_weight_kg,
                buffer_kg,
                buffered_weight_kg
            ),
        ),
        None => (
            serde_json::Value::Null,
            format!(
                "{} kg exceeds every tier: {} kg + {} kg buffer = {} kg",
                billing_weight_kg, billing_weight_kg, buffer_kg, buffered_weight_kg
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "safety_buffer".to_string(),
        rule_name: "Safety Buffer".to_string(),
        slot,
        input: serde_json::json!({
            "billing_weight_kg": billing_weight_kg.to_string()
        }),
        output: serde_json::json!({
            "tier_ceiling_kg": tier_ceiling,
            "buffer_kg": buffer_kg.to_string(),
            "buffered_weight_kg": buffered_weight_kg.to_string()
        }),
        reasoning,
    };

    Ok(SafetyBufferResult {
        buffer_kg,
        buffered_weight_kg,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_tier_ceilings_are_inclusive() {
        assert_eq!(apply_buffer(dec("4")).unwrap(), dec("5"));
        assert_eq!(apply_buffer(dec("5")).unwrap(), dec("6"));
        assert_eq!(apply_buffer(dec("10")).unwrap(), dec("12"));
        assert_eq!(apply_buffer(dec("500")).unwrap(), dec("535"));
    }

    #[test]
    fn test_just_above_a_ceiling_uses_next_tier() {
        // 5.5 falls in the <= 10 tier.
        assert_eq!(buffer_for(dec("5.5")), dec("2"));
        assert_eq!(apply_buffer(dec("5.5")).unwrap(), dec("7.5"));
        assert_eq!(buffer_for(dec("25.5")), dec("5"));
        assert_eq!(buffer_for(dec("50.5")), dec("8"));
    }

    #[test]
    fn test_fractional_buffer_tier() {
        assert_eq!(buffer_for(dec("12.5")), dec("2.5"));
        assert_eq!(apply_buffer(dec("12.5")).unwrap(), dec("15"));
    }

    #[test]
    fn test_overflow_buffer() {
        assert_eq!(buffer_for(dec("500.5")), dec("40"));
        assert_eq!(apply_buffer(dec("600")).unwrap(), dec("640"));
    }

    #[test]
    fn test_zero_weight_gets_no_buffer() {
        assert_eq!(apply_buffer(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_audit_step_records_tier() {
        let result = calculate_safety_buffer(dec("63.5"), None, 2).unwrap();

        assert_eq!(result.buffer_kg, dec("8"));
        assert_eq!(result.buffered_weight_kg, dec("71.5"));
        assert_eq!(result.audit_step.rule_id, "safety_buffer");
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.output["tier_ceiling_kg"], "75");
        assert_eq!(result.audit_step.output["buffered_weight_kg"], "71.5");
        assert!(result.audit_step.reasoning.contains("75 kg tier"));
    }

    #[test]
    fn test_audit_step_for_overflow() {
        let result = calculate_safety_buffer(dec("750"), Some(1), 3).unwrap();

        assert_eq!(result.buffered_weight_kg, dec("790"));
        assert!(result.audit_step.output["tier_ceiling_kg"].is_null());
        assert!(result.audit_step.reasoning.contains("exceeds every tier"));
    }

    #[test]
    fn test_overflowing_weight_is_out_of_range() {
        assert!(matches!(
            apply_buffer(Decimal::MAX),
            Err(EngineError::WeightOutOfRange { .. })
        ));

        match calculate_safety_buffer(Decimal::MAX, None, 2) {
            Err(EngineError::WeightOutOfRange { message }) => {
                assert!(message.contains("40 kg buffer"), "unexpected message: {}", message);
            }
            other => panic!("Expected WeightOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_tiers_ascend() {
        assert!(BUFFER_TIERS.windows(2).all(|pair| pair[0].0 < pair[1].0));
        assert!(BUFFER_TIERS.windows(2).all(|pair| pair[0].1 <= pair[1].1));
    }

    proptest! {
        #[test]
        fn prop_buffer_is_monotonic(a in 0i64..2_000_000, b in 0i64..2_000_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low = Decimal::new(low, 3);
            let high = Decimal::new(high, 3);
            prop_assert!(buffer_for(low) <= buffer_for(high));
            prop_assert!(apply_buffer(low).unwrap() <= apply_buffer(high).unwrap());
        }
    }
}
