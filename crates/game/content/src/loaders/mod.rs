//! Content loaders for reading dispenser data from files.

pub mod factory;
pub mod item;
pub mod module;

pub use factory::ContentFactory;
pub use item::{ItemCatalog, ItemLoader};
pub use module::{BagModuleSpec, ModuleLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
