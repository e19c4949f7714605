//! Country → zone resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Zone;

/// A supported origin country and the zone that prices it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryZone {
    /// The country name as presented to users.
    pub country: String,
    /// The zone column that prices shipments from this country.
    pub zone: Zone,
}

/// Maps origin countries to rate zones.
///
/// Lookups ignore case and surrounding whitespace. Every country maps to
/// exactly one zone; a zone may serve several countries.
///
/// # Example
///
/// ```
/// use freight_quote::models::Zone;
/// use freight_quote::rates::ZoneMap;
///
/// let zones = ZoneMap::standard();
/// assert_eq!(zones.resolve(" hong kong ").unwrap(), Zone::TaiwanHongKong);
/// assert!(zones.resolve("France").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ZoneMap {
    countries: Vec<CountryZone>,
    index: HashMap<String, Zone>,
}

impl ZoneMap {
    /// Builds a map from country entries.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedRateTable`] if the list is empty, a
    /// country name is blank, or a country appears twice.
    pub fn new(countries: Vec<CountryZone>) -> EngineResult<Self> {
        if countries.is_empty() {
            return Err(EngineError::malformed("no supported countries defined"));
        }

        let mut index = HashMap::with_capacity(countries.len());
        for entry in &countries {
            let key = normalize(&entry.country);
            if key.is_empty() {
                return Err(EngineError::malformed("blank country name in zone map"));
            }
            if index.insert(key, entry.zone).is_some() {
                return Err(EngineError::malformed(format!(
                    "country '{}' is mapped more than once",
                    entry.country.trim()
                )));
            }
        }

        Ok(Self { countries, index })
    }

    /// The carrier's standard mapping for import rates.
    pub fn standard() -> Self {
        let countries = [
            ("China", Zone::China),
            ("Taiwan", Zone::TaiwanHongKong),
            ("Hong Kong", Zone::TaiwanHongKong),
            ("Thailand", Zone::Thailand),
        ]
        .into_iter()
        .map(|(country, zone)| CountryZone {
            country: country.to_string(),
            zone,
        })
        .collect::<Vec<_>>();

        let index = countries
            .iter()
            .map(|entry| (normalize(&entry.country), entry.zone))
            .collect();

        Self { countries, index }
    }

    /// Resolves an origin country to its zone.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedCountry`] if the country is not mapped.
    pub fn resolve(&self, country: &str) -> EngineResult<Zone> {
        self.index
            .get(&normalize(country))
            .copied()
            .ok_or_else(|| EngineError::UnsupportedCountry {
                country: country.trim().to_string(),
            })
    }

    /// The supported countries, in source order.
    pub fn countries(&self) -> &[CountryZone] {
        &self.countries
    }
}

fn normalize(country: &str) -> String {
    country.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
