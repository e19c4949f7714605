//! Core data models for the Freight Quote Engine.
//!
//! This module contains the domain models used throughout the engine.

mod money;
mod quote_request;
mod quote_result;
mod zone;

pub use money::format_money;
pub use quote_request::{MAX_QUANTITY_SLOTS, QuoteMethod, QuoteRequest, WeightInput};
pub use quote_result::{
    AuditStep, AuditTrace, QuoteLine, QuoteOutcome, QuoteResult, RateBasis,
};
pub use zone::Zone;
