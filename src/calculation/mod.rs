//! Calculation logic for the Freight Quote Engine.
//!
//! A quote runs each weight through three stages: rounding to the
//! half-kilogram billing unit, adding the tiered safety buffer, and resolving
//! the buffered weight against the rate table. [`QuoteEngine`] orchestrates
//! the stages and assembles the audit trail.

mod billing_weight;
mod quote_engine;
mod rate_resolution;
mod safety_buffer;

pub use billing_weight::{BillingWeightResult, calculate_billing_weight, round_to_billing_unit};
pub use quote_engine::QuoteEngine;
pub use rate_resolution::{RateResolutionResult, resolve_rate};
pub use safety_buffer::{
    BUFFER_TIERS, OVERFLOW_BUFFER_KG, SafetyBufferResult, apply_buffer, buffer_for,
    calculate_safety_buffer,
};
