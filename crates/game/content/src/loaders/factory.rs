//! Content factory for loading dispenser data from a directory.

use std::path::{Path, PathBuf};

use holding_core::ItemDescriptor;

use crate::loaders::{BagModuleSpec, ItemLoader, LoadResult, ModuleLoader};

/// Content factory that loads all dispenser content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── items.ron
/// └── bags.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const ITEMS_FILE: &'static str = "items.ron";
    pub const BAGS_FILE: &'static str = "bags.toml";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the sample data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDescriptor>> {
        ItemLoader::load(&self.data_dir.join(Self::ITEMS_FILE))
    }

    /// Load bag modules from `bags.toml`.
    pub fn load_modules(&self) -> LoadResult<Vec<BagModuleSpec>> {
        ModuleLoader::load(&self.data_dir.join(Self::BAGS_FILE))
    }

    /// Load a single bag module by id.
    pub fn load_module(&self, id: &str) -> LoadResult<BagModuleSpec> {
        self.load_modules()?
            .into_iter()
            .find(|bag| bag.id == id)
            .ok_or_else(|| anyhow::anyhow!("bag module '{}' not found", id))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
