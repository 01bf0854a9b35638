//! Runtime wrappers around static content oracles.
//!
//! The catalog is immutable once the runtime is built; dynamic state lives in
//! the dispenser worker.
mod catalog;

use std::sync::Arc;

use holding_core::{CatalogOracle, PcgRng, RngOracle};

pub use catalog::CatalogOracleImpl;

/// Bundles the catalog and RNG oracles handed to every dispenser call.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) catalog: Arc<dyn CatalogOracle>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(catalog: Arc<dyn CatalogOracle>) -> Self {
        Self {
            catalog,
            rng: PcgRng, // PcgRng is stateless
        }
    }

    pub fn catalog(&self) -> &dyn CatalogOracle {
        self.catalog.as_ref()
    }

    pub fn rng(&self) -> &dyn RngOracle {
        &self.rng
    }
}
