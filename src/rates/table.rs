//! The immutable rate table.
//!
//! A [`RateTable`] is validated once from a [`RateGrid`] and then only read.
//! Weights up to the flat-rate ceiling are priced from exact half-kilogram
//! breakpoint rows; heavier weights are multiplied by the per-kg multiplier of
//! the band that contains them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::RateGrid;
use crate::error::{EngineError, EngineResult};
use crate::models::{RateBasis, Zone};

/// The heaviest weight priced from breakpoint rows, in kilograms.
pub const FLAT_RATE_CEILING_KG: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

/// The spacing of breakpoint rows, in kilograms.
pub const BREAKPOINT_STEP_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// The inclusive upper limits of the multiplier bands, in order; `None` is
/// the open-ended last band.
pub const MULTIPLIER_BAND_LIMITS: [Option<Decimal>; 4] = [
    Some(Decimal::from_parts(150, 0, 0, false, 0)),
    Some(Decimal::from_parts(300, 0, 0, false, 0)),
    Some(Decimal::from_parts(999, 0, 0, false, 0)),
    None,
];

/// One value per zone, indexed by [`Zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZoneValues([Decimal; Zone::ALL.len()]);

impl ZoneValues {
    fn get(&self, zone: Zone) -> Decimal {
        self.0[zone.index()]
    }

    /// Converts a zone-name keyed map, requiring every zone exactly once.
    fn from_cells(cells: &BTreeMap<String, Decimal>, row: &str) -> EngineResult<Self> {
        let mut values: [Option<Decimal>; Zone::ALL.len()] = [None; Zone::ALL.len()];

        for (name, value) in cells {
            let zone: Zone = name
                .parse()
                .map_err(|e| EngineError::malformed(format!("{}: {}", row, e)))?;
            if value.is_sign_negative() {
                return Err(EngineError::malformed(format!(
                    "{}: negative value {} for zone {}",
                    row, value, zone
                )));
            }
            values[zone.index()] = Some(*value);
        }

        let mut resolved = [Decimal::ZERO; Zone::ALL.len()];
        for zone in Zone::ALL {
            resolved[zone.index()] = values[zone.index()].ok_or_else(|| {
                EngineError::malformed(format!("{}: missing zone column '{}'", row, zone))
            })?;
        }

        Ok(Self(resolved))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Breakpoint {
    weight_kg: Decimal,
    prices: ZoneValues,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MultiplierBand {
    /// Inclusive upper limit; `None` for the open-ended last band.
    up_to_kg: Option<Decimal>,
    multipliers: ZoneValues,
}

impl MultiplierBand {
    fn contains(&self, weight_kg: Decimal) -> bool {
        self.up_to_kg.is_none_or(|limit| weight_kg <= limit)
    }
}

/// The price and the basis used for one rate lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateResolution {
    /// The resolved cost.
    pub price: Decimal,
    /// How the cost was derived.
    pub basis: RateBasis,
}

/// Billing weight → price lookup for every zone.
///
/// # Example
///
/// ```no_run
/// use freight_quote::config::ConfigLoader;
/// use freight_quote::models::Zone;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/dhl_us_import")?;
/// let price = loader.rate_table().price_for(Decimal::new(75, 1), Zone::China)?;
/// println!("7.5 kg from China: ${}", price);
/// # Ok::<(), freight_quote::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    breakpoints: Vec<Breakpoint>,
    bands: Vec<MultiplierBand>,
}

impl RateTable {
    /// Validates a materialized rate grid and builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedRateTable`] if:
    /// - a breakpoint is not a positive multiple of 0.5 kg, is duplicated, or
    ///   the rows do not cover every half kilogram from 0.5 to 70 kg
    /// - a row is missing a zone column, names an unknown zone, or holds a
    ///   negative value
    /// - the multiplier bands are not strictly ascending above 70 kg, do
    ///   not end with exactly one unbounded band, or differ from
    ///   [`MULTIPLIER_BAND_LIMITS`]
    pub fn load(grid: &RateGrid) -> EngineResult<Self> {
        let breakpoints = Self::load_breakpoints(grid)?;
        let bands = Self::load_bands(grid)?;
        Ok(Self { breakpoints, bands })
    }

    fn load_breakpoints(grid: &RateGrid) -> EngineResult<Vec<Breakpoint>> {
        let mut breakpoints = grid
            .breakpoints
            .iter()
            .map(|row| {
                let label = format!("breakpoint {} kg", row.weight);
                let on_grid = (row.weight / BREAKPOINT_STEP_KG).fract().is_zero();
                if row.weight <= Decimal::ZERO || !on_grid {
                    return Err(EngineError::malformed(format!(
                        "{} is not a positive multiple of {} kg",
                        label, BREAKPOINT_STEP_KG
                    )));
                }
                Ok(Breakpoint {
                    weight_kg: row.weight.normalize(),
                    prices: ZoneValues::from_cells(&row.prices, &label)?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        breakpoints.sort_by(|a, b| a.weight_kg.cmp(&b.weight_kg));

        if let Some(pair) = breakpoints
            .windows(2)
            .find(|pair| pair[0].weight_kg == pair[1].weight_kg)
        {
            return Err(EngineError::malformed(format!(
                "duplicate breakpoint row for {} kg",
                pair[0].weight_kg
            )));
        }

        let mut expected = BREAKPOINT_STEP_KG;
        for breakpoint in &breakpoints {
            if breakpoint.weight_kg > FLAT_RATE_CEILING_KG {
                return Err(EngineError::malformed(format!(
                    "breakpoint {} kg exceeds the flat-rate ceiling of {} kg",
                    breakpoint.weight_kg, FLAT_RATE_CEILING_KG
                )));
            }
            if breakpoint.weight_kg != expected {
                return Err(EngineError::malformed(format!(
                    "missing breakpoint row for {} kg",
                    expected
                )));
            }
            expected += BREAKPOINT_STEP_KG;
        }

        if expected <= FLAT_RATE_CEILING_KG {
            return Err(EngineError::malformed(format!(
                "missing breakpoint row for {} kg",
                expected
            )));
        }

        Ok(breakpoints)
    }

    fn load_bands(grid: &RateGrid) -> EngineResult<Vec<MultiplierBand>> {
        let bands = grid
            .multiplier_bands
            .iter()
            .map(|row| {
                let label = match row.up_to_kg {
                    Some(limit) => format!("multiplier band up to {} kg", limit),
                    None => "unbounded multiplier band".to_string(),
                };
                Ok(MultiplierBand {
                    up_to_kg: row.up_to_kg,
                    multipliers: ZoneValues::from_cells(&row.multipliers, &label)?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let Some((last, bounded)) = bands.split_last() else {
            return Err(EngineError::malformed("no multiplier bands defined"));
        };

        if last.up_to_kg.is_some() {
            return Err(EngineError::malformed(
                "the last multiplier band must be unbounded",
            ));
        }

        let mut lower = FLAT_RATE_CEILING_KG;
        for band in bounded {
            match band.up_to_kg {
                None => {
                    return Err(EngineError::malformed(
                        "only the last multiplier band may be unbounded",
                    ));
                }
                Some(limit) if limit <= lower => {
                    return Err(EngineError::malformed(format!(
                        "multiplier band up to {} kg does not extend past {} kg",
                        limit, lower
                    )));
                }
                Some(limit) => lower = limit,
            }
        }

        let limits: Vec<Option<Decimal>> = bands.iter().map(|band| band.up_to_kg).collect();
        if limits != MULTIPLIER_BAND_LIMITS {
            return Err(EngineError::malformed(format!(
                "expected multiplier bands up to [{}] kg, found [{}]",
                describe_limits(&MULTIPLIER_BAND_LIMITS),
                describe_limits(&limits)
            )));
        }

        Ok(bands)
    }

    /// Returns the cost of shipping `billing_weight_kg` from `zone`.
    ///
    /// See [`RateTable::resolve`] for the lookup rules.
    pub fn price_for(&self, billing_weight_kg: Decimal, zone: Zone) -> EngineResult<Decimal> {
        self.resolve(billing_weight_kg, zone).map(|r| r.price)
    }

    /// Resolves a billing weight to a price and the basis used.
    ///
    /// - At or below zero the price is zero.
    /// - Up to 70 kg the weight must equal a breakpoint exactly; otherwise
    ///   this returns [`EngineError::RateLookup`].
    /// - Above 70 kg the weight is multiplied by the multiplier of the first
    ///   band whose inclusive upper limit is not below it; a product too large
    ///   for a decimal returns [`EngineError::WeightOutOfRange`].
    pub fn resolve(&self, billing_weight_kg: Decimal, zone: Zone) -> EngineResult<RateResolution> {
        if billing_weight_kg <= Decimal::ZERO {
            return Ok(RateResolution {
                price: Decimal::ZERO,
                basis: RateBasis::Zero,
            });
        }

        if billing_weight_kg <= self.flat_ceiling() {
            let index = self
                .breakpoints
                .binary_search_by(|bp| bp.weight_kg.cmp(&billing_weight_kg))
                .map_err(|_| EngineError::RateLookup {
                    weight: billing_weight_kg,
                    zone,
                })?;
            let breakpoint = &self.breakpoints[index];
            return Ok(RateResolution {
                price: breakpoint.prices.get(zone),
                basis: RateBasis::Flat {
                    breakpoint_kg: breakpoint.weight_kg,
                },
            });
        }

        let band = self
            .bands
            .iter()
            .find(|band| band.contains(billing_weight_kg))
            .ok_or(EngineError::RateLookup {
                weight: billing_weight_kg,
                zone,
            })?;
        let multiplier = band.multipliers.get(zone);
        let price = billing_weight_kg.checked_mul(multiplier).ok_or_else(|| {
            EngineError::out_of_range(format!(
                "{} kg x {} per kg in zone {}",
                billing_weight_kg, multiplier, zone
            ))
        })?;

        Ok(RateResolution {
            price,
            basis: RateBasis::Multiplier {
                band_up_to_kg: band.up_to_kg,
                multiplier,
            },
        })
    }

    /// Returns the per-kg multiplier of the band containing `weight_kg`.
    ///
    /// Weights at or below the flat-rate ceiling have no multiplier.
    pub fn multiplier_for(&self, weight_kg: Decimal, zone: Zone) -> Option<Decimal> {
        if weight_kg <= self.flat_ceiling() {
            return None;
        }
        self.bands
            .iter()
            .find(|band| band.contains(weight_kg))
            .map(|band| band.multipliers.get(zone))
    }

    /// The heaviest weight priced from breakpoint rows.
    pub fn flat_ceiling(&self) -> Decimal {
        self.breakpoints
            .last()
            .map_or(FLAT_RATE_CEILING_KG, |bp| bp.weight_kg)
    }

    /// The number of breakpoint rows.
    pub fn breakpoint_count(&self) -> usize {
        self.breakpoints.len()
    }

    /// The inclusive upper limits of the multiplier bands, `None` for the
    /// unbounded band.
    pub fn band_limits(&self) -> Vec<Option<Decimal>> {
        self.bands.iter().map(|band| band.up_to_kg).collect()
    }
}

fn describe_limits(limits: &[Option<Decimal>]) -> String {
    limits
        .iter()
        .map(|limit| limit.map_or_else(|| "unbounded".to_string(), |kg| kg.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}
