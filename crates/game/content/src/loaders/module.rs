//! Bag module loader.
//!
//! A bag module describes one dispenser container: which catalog items it may
//! hand out and how many times it restocks.

use std::collections::HashSet;
use std::path::Path;

use holding_core::{CategorySelector, DispenserSettings, FilterConfig};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One `[[bag]]` table.
///
/// ```toml
/// [[bag]]
/// id = "quiver_bag"
/// item_category = 2          # -1 (default) = any category
/// override_mode = true
/// override_category = "Arrows"
/// override_items = ["QuiverBroadhead"]
/// capacity = 10              # 0 (default) = unlimited
/// despawn_bag_on_empty = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BagModuleSpec {
    pub id: String,
    /// Raw category index (0 misc .. 6 shield).
    pub item_category: i64,
    pub override_mode: bool,
    pub override_category: String,
    pub override_items: Vec<String>,
    pub excluded_categories: Vec<String>,
    pub excluded_items: Vec<String>,
    pub capacity: i64,
    pub despawn_bag_on_empty: bool,
}

impl Default for BagModuleSpec {
    fn default() -> Self {
        Self {
            id: String::new(),
            item_category: -1,
            override_mode: false,
            override_category: String::new(),
            override_items: Vec::new(),
            excluded_categories: Vec::new(),
            excluded_items: Vec::new(),
            capacity: DispenserSettings::UNLIMITED,
            despawn_bag_on_empty: false,
        }
    }
}

impl BagModuleSpec {
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            category: CategorySelector::from_index(self.item_category),
            override_mode: self.override_mode,
            override_category: Some(self.override_category.clone())
                .filter(|tag| !tag.is_empty()),
            override_items: self.override_items.clone(),
            excluded_categories: self.excluded_categories.clone(),
            excluded_items: self.excluded_items.clone(),
        }
    }

    pub fn settings(&self) -> DispenserSettings {
        DispenserSettings::new(self.capacity, self.despawn_bag_on_empty)
    }
}

#[derive(Debug, Default, Deserialize)]
struct BagModuleFile {
    #[serde(default)]
    bag: Vec<BagModuleSpec>,
}

/// Loader for bag modules from TOML files.
pub struct ModuleLoader;

impl ModuleLoader {
    /// Load every `[[bag]]` table from a TOML file, in file order.
    pub fn load(path: &Path) -> LoadResult<Vec<BagModuleSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid bag modules {}: {}", path.display(), e))
    }

    /// Parse bag modules from TOML text.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, a missing `id`, or a repeated `id`.
    pub fn parse(content: &str) -> LoadResult<Vec<BagModuleSpec>> {
        let file: BagModuleFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bag module TOML: {}", e))?;

        let mut seen = HashSet::new();
        for (index, bag) in file.bag.iter().enumerate() {
            if bag.id.is_empty() {
                anyhow::bail!("bag #{} has no id", index);
            }
            if !seen.insert(bag.id.as_str()) {
                anyhow::bail!("duplicate bag id '{}'", bag.id);
            }
        }

        Ok(file.bag)
    }
}
