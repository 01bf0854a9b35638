//! Item catalog loader.

use std::collections::HashSet;
use std::path::Path;

use holding_core::ItemDescriptor;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
///
/// ```ron
/// ItemCatalog(
///     items: [
///         (
///             identifier: "SwordShortCommon",
///             category: weapon,
///             category_path: ["Weapons", "Swords"],
///             purchasable: true,
///         ),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDescriptor>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// Entries keep file order, which is the enumeration order used when
    /// building eligible pools.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or if an identifier
    /// appears twice.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDescriptor>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid item catalog {}: {}", path.display(), e))
    }

    /// Parse an item catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ItemDescriptor>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for item in &catalog.items {
            if !seen.insert(item.identifier.as_str()) {
                anyhow::bail!("duplicate item identifier '{}'", item.identifier);
            }
        }

        tracing::debug!(items = catalog.items.len(), "item catalog loaded");
        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holding_core::ItemCategory;

    #[test]
    fn parses_catalog_in_file_order() {
        let items = ItemLoader::parse(
            r#"ItemCatalog(
                items: [
                    (identifier: "SwordShort", category: weapon, category_path: ["Weapons", "Swords"], purchasable: true),
                    (identifier: "PotionHealth", category: potion, category_path: ["Potions"], purchasable: true),
                    (identifier: "SwordDev", category: weapon, purchasable: false),
                ],
            )"#,
        )
        .expect("catalog should parse");

        let ids: Vec<_> = items.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, ["SwordShort", "PotionHealth", "SwordDev"]);
        assert_eq!(items[1].category, ItemCategory::Potion);
        assert!(items[2].category_path.is_empty());
        assert!(!items[2].purchasable);
    }

    #[test]
    fn purchasable_defaults_to_false() {
        let items =
            ItemLoader::parse(r#"ItemCatalog(items: [(identifier: "Rock", category: misc)])"#)
                .unwrap();
        assert!(!items[0].purchasable);
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let err = ItemLoader::parse(
            r#"ItemCatalog(items: [
                (identifier: "Rock", category: misc),
                (identifier: "Rock", category: prop),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate item identifier 'Rock'"));
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.ron");
        std::fs::write(&path, "not ron at all (").unwrap();

        let err = ItemLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("items.ron"));
    }
}
