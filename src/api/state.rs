//! Application state for the Freight Quote Engine API.

use std::sync::Arc;

use crate::calculation::QuoteEngine;
use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the loaded rate source and an engine over its tables. Both are
/// read-only, so handlers share them without locking.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    engine: QuoteEngine,
}

impl AppState {
    /// Creates a new application state from a loaded rate source.
    pub fn new(config: ConfigLoader) -> Self {
        let engine = config.engine();
        Self {
            config: Arc::new(config),
            engine,
        }
    }

    /// Returns the loaded rate source.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the quote engine.
    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }
}
