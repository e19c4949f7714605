//! Configuration loading for the Freight Quote Engine.
//!
//! This module loads a carrier's rate source from YAML files: the rate sheet
//! metadata, the supported countries and the rate grid itself.
//!
//! # Example
//!
//! ```no_run
//! use freight_quote::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/dhl_us_import").unwrap();
//! println!("Loaded rates: {}", config.metadata().sheet);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BreakpointRow, CarrierMetadata, MultiplierBandRow, RateGrid, ZonesConfig};
