//! Configuration types for the rate source.
//!
//! This module contains the structures deserialized from the YAML files of a
//! rate source directory. They mirror the physical grid of the carrier's
//! rate sheet and are validated into a [`RateTable`](crate::rates::RateTable)
//! and a [`ZoneMap`](crate::rates::ZoneMap) by the loader.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rates::CountryZone;

/// Metadata about the rate sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierMetadata {
    /// The carrier that publishes the rates (e.g., "DHL Express").
    pub carrier: String,
    /// The name of the rate sheet the grid was taken from.
    pub sheet: String,
    /// The currency of every price in the grid.
    pub currency: String,
    /// The date from which the rates apply.
    pub effective_date: NaiveDate,
}

/// Zones configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ZonesConfig {
    /// The supported origin countries and their zones.
    pub countries: Vec<CountryZone>,
}

/// A flat-price row of the rate grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BreakpointRow {
    /// The billing weight of the row in kilograms.
    pub weight: Decimal,
    /// Map of zone name to the flat price at this weight.
    pub prices: BTreeMap<String, Decimal>,
}

/// A per-kilogram multiplier row of the rate grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MultiplierBandRow {
    /// The inclusive upper weight limit of the band; absent for the last,
    /// open-ended band.
    #[serde(default)]
    pub up_to_kg: Option<Decimal>,
    /// Map of zone name to the per-kilogram multiplier in this band.
    pub multipliers: BTreeMap<String, Decimal>,
}

/// The materialized rate grid, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateGrid {
    /// Flat-price rows, one per half kilogram.
    pub breakpoints: Vec<BreakpointRow>,
    /// Multiplier bands for weights above the flat-rate ceiling.
    pub multiplier_bands: Vec<MultiplierBandRow>,
}
