//! Rate resolution for the Freight Quote Engine.
//!
//! This module holds the read-only lookup structures the quote pipeline
//! prices against: the [`RateTable`] of breakpoint prices and multiplier
//! bands, and the [`ZoneMap`] that assigns origin countries to rate columns.

mod table;
mod zone_map;

pub use table::{
    BREAKPOINT_STEP_KG, FLAT_RATE_CEILING_KG, MULTIPLIER_BAND_LIMITS, RateResolution, RateTable,
};
pub use zone_map::{CountryZone, ZoneMap};

#[cfg(test)]
pub(crate) use table::tests::sample_table;
