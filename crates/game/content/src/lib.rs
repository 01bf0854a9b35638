//! Data-driven content for item dispensers.
//!
//! This crate loads the static data a host needs to build dispensers:
//! - Item catalogs (data-driven via RON)
//! - Bag modules, i.e. per-container filter and usage settings (via TOML)
//!
//! Content is consumed by runtime oracles and never changes after loading.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{BagModuleSpec, ContentFactory, ItemLoader, LoadResult, ModuleLoader};
