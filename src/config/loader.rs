//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a carrier's
//! rate source from YAML files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::calculation::QuoteEngine;
use crate::error::{EngineError, EngineResult};
use crate::rates::{RateTable, ZoneMap};

use super::types::{CarrierMetadata, RateGrid, ZonesConfig};

/// Loads and provides access to a rate source.
///
/// The `ConfigLoader` reads the YAML files of a rate source directory,
/// validates them into a [`RateTable`] and a [`ZoneMap`], and hands out
/// [`QuoteEngine`]s that share both.
///
/// # Directory Structure
///
/// ```text
/// config/dhl_us_import/
/// ├── carrier.yaml   # Carrier, sheet name, currency, effective date
/// ├── zones.yaml     # Supported countries and their zones
/// └── rates.yaml     # Breakpoint rows and multiplier bands
/// ```
///
/// # Example
///
/// ```no_run
/// use freight_quote::config::ConfigLoader;
/// use freight_quote::models::QuoteRequest;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/dhl_us_import")?;
/// let engine = loader.engine();
///
/// let quote = engine.quote(&QuoteRequest::gross_weight("China", Decimal::new(632, 1)))?;
/// println!("Estimated: {:?}", quote.amounts());
/// # Ok::<(), freight_quote::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    metadata: CarrierMetadata,
    rate_table: Arc<RateTable>,
    zones: Arc<ZoneMap>,
}

impl ConfigLoader {
    /// Loads a rate source from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the rate source directory (e.g., "./config/dhl_us_import")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or a non-numeric cell (`ConfigParseError`)
    /// - The grid or zone list violates the table invariants (`MalformedRateTable`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<CarrierMetadata>(&path.join("carrier.yaml"))?;
        let zones_config = Self::load_yaml::<ZonesConfig>(&path.join("zones.yaml"))?;
        let grid = Self::load_yaml::<RateGrid>(&path.join("rates.yaml"))?;

        let zones = ZoneMap::new(zones_config.countries)?;
        let rate_table = RateTable::load(&grid)?;

        info!(
            carrier = %metadata.carrier,
            sheet = %metadata.sheet,
            effective_date = %metadata.effective_date,
            breakpoints = rate_table.breakpoint_count(),
            countries = zones.countries().len(),
            "Loaded rate source"
        );

        Ok(Self::from_parts(metadata, rate_table, zones))
    }

    /// Assembles a loader from already validated parts.
    pub fn from_parts(metadata: CarrierMetadata, rate_table: RateTable, zones: ZoneMap) -> Self {
        Self {
            metadata,
            rate_table: Arc::new(rate_table),
            zones: Arc::new(zones),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();
        debug!(path = %path_str, "Reading rate source file");

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the rate sheet metadata.
    pub fn metadata(&self) -> &CarrierMetadata {
        &self.metadata
    }

    /// Returns the validated rate table.
    pub fn rate_table(&self) -> &RateTable {
        &self.rate_table
    }

    /// Returns the country → zone map.
    pub fn zones(&self) -> &ZoneMap {
        &self.zones
    }

    /// Creates a quote engine sharing this loader's tables.
    pub fn engine(&self) -> QuoteEngine {
        QuoteEngine::new(Arc::clone(&self.rate_table), Arc::clone(&self.zones))
    }
}
