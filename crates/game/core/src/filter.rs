//! Catalog filtering into the eligible-item pool.
//!
//! The pool is computed once per dispenser from the catalog contents and a
//! declarative [`FilterConfig`]. Filtering is a pure function of its inputs:
//! no randomness, and the output order follows catalog enumeration order
//! (or `override_items` order for explicitly listed identifiers).
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{CatalogOracle, ItemCategory, ItemDescriptor, ItemId};

/// Raised when the configured category index is not a known category.
///
/// Not returned to callers: the filter falls back to "no category
/// restriction" and records the fallback in [`FilterReport`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("category index {0} is outside 0..=6")]
    CategoryOutOfRange(i64),
}

/// Decoded category restriction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CategorySelector {
    /// No restriction.
    #[default]
    Any,
    Only(ItemCategory),
    /// Index above the known range; treated as [`CategorySelector::Any`].
    Invalid(i64),
}

impl CategorySelector {
    /// Negative indices mean "any category".
    pub fn from_index(index: i64) -> Self {
        if index < 0 {
            return Self::Any;
        }
        match ItemCategory::from_index(index) {
            Some(category) => Self::Only(category),
            None => Self::Invalid(index),
        }
    }

    /// Resolves to the effective restriction, or the configuration error that
    /// caused the permissive fallback.
    pub fn resolve(self) -> Result<Option<ItemCategory>, ConfigurationError> {
        match self {
            Self::Any => Ok(None),
            Self::Only(category) => Ok(Some(category)),
            Self::Invalid(index) => Err(ConfigurationError::CategoryOutOfRange(index)),
        }
    }
}

impl From<Option<ItemCategory>> for CategorySelector {
    fn from(category: Option<ItemCategory>) -> Self {
        category.map_or(Self::Any, Self::Only)
    }
}

/// Declarative filter configuration, fixed for the life of a dispenser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    pub category: CategorySelector,
    /// Build the pool only from `override_category` / `override_items`.
    pub override_mode: bool,
    /// Tag substring selecting items in override mode. Empty means none.
    pub override_category: Option<String>,
    /// Identifiers added in override mode, in this order.
    pub override_items: Vec<ItemId>,
    /// Tag substrings removed in exclusion mode.
    pub excluded_categories: Vec<String>,
    /// Identifier substrings removed in exclusion mode.
    pub excluded_items: Vec<String>,
}

impl FilterConfig {
    pub fn with_category(mut self, category: impl Into<CategorySelector>) -> Self {
        self.category = category.into();
        self
    }

    pub fn overriding<I, S>(mut self, tag: Option<&str>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        self.override_mode = true;
        self.override_category = tag.map(str::to_owned);
        self.override_items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn excluding<C, I>(mut self, categories: C, items: I) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.override_mode = false;
        self.excluded_categories = categories.into_iter().map(Into::into).collect();
        self.excluded_items = items.into_iter().map(Into::into).collect();
        self
    }

    fn override_tag(&self) -> Option<&str> {
        self.override_category.as_deref().filter(|tag| !tag.is_empty())
    }
}

/// Ordered, immutable list of identifiers a dispenser may draw from.
///
/// Cheap to clone; every entry was purchasable when the pool was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EligiblePool {
    items: Arc<[ItemId]>,
}

impl EligiblePool {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.items.iter().any(|item| item == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.items
    }
}

impl From<Vec<ItemId>> for EligiblePool {
    fn from(items: Vec<ItemId>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

/// Diagnostics gathered while building a pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Purchasable items left after the category restriction.
    pub base_size: usize,
    pub eligible_size: usize,
    /// Set when an out-of-range category index was ignored.
    pub category_fallback: Option<ConfigurationError>,
    /// Catalog identifiers that had no descriptor.
    pub missing_descriptors: Vec<ItemId>,
    /// `override_items` entries that were not in the base pool.
    pub rejected_overrides: Vec<ItemId>,
}

/// Stateless pool builder.
pub struct CatalogFilter;

impl CatalogFilter {
    /// Builds the pool from a catalog oracle, in catalog order.
    pub fn build(
        catalog: &dyn CatalogOracle,
        config: &FilterConfig,
    ) -> (EligiblePool, FilterReport) {
        let mut missing = Vec::new();
        let descriptors: Vec<ItemDescriptor> = catalog
            .identifiers()
            .into_iter()
            .filter_map(|id| match catalog.descriptor(&id) {
                Some(descriptor) => Some(descriptor),
                None => {
                    missing.push(id);
                    None
                }
            })
            .collect();

        let (pool, mut report) = Self::apply(&descriptors, config);
        report.missing_descriptors = missing;
        (pool, report)
    }

    /// Builds the pool from descriptors already in catalog order.
    pub fn apply(
        descriptors: &[ItemDescriptor],
        config: &FilterConfig,
    ) -> (EligiblePool, FilterReport) {
        let mut report = FilterReport::default();

        let category = match config.category.resolve() {
            Ok(category) => category,
            Err(error) => {
                warn!(%error, "ignoring category restriction");
                report.category_fallback = Some(error);
                None
            }
        };

        let base: Vec<&ItemDescriptor> = descriptors
            .iter()
            .filter(|d| d.purchasable)
            .filter(|d| category.is_none_or(|c| d.category == c))
            .collect();
        report.base_size = base.len();

        let eligible = if config.override_mode {
            Self::select_overrides(&base, config, &mut report)
        } else {
            Self::apply_exclusions(&base, config)
        };

        report.eligible_size = eligible.len();
        debug!(
            base = report.base_size,
            eligible = report.eligible_size,
            override_mode = config.override_mode,
            "built eligible pool"
        );

        (EligiblePool::from(eligible), report)
    }

    fn select_overrides(
        base: &[&ItemDescriptor],
        config: &FilterConfig,
        report: &mut FilterReport,
    ) -> Vec<ItemId> {
        let mut selected: Vec<ItemId> = match config.override_tag() {
            Some(tag) => base
                .iter()
                .filter(|d| d.path_contains(tag))
                .map(|d| d.identifier.clone())
                .collect(),
            None => Vec::new(),
        };

        for identifier in &config.override_items {
            if selected.contains(identifier) {
                continue;
            }
            if base.iter().any(|d| &d.identifier == identifier) {
                selected.push(identifier.clone());
            } else if !report.rejected_overrides.contains(identifier) {
                debug!(item = %identifier, "override item not in base pool");
                report.rejected_overrides.push(identifier.clone());
            }
        }

        selected
    }

    fn apply_exclusions(base: &[&ItemDescriptor], config: &FilterConfig) -> Vec<ItemId> {
        base.iter()
            .filter(|d| {
                !config
                    .excluded_categories
                    .iter()
                    .any(|tag| d.path_contains(tag))
            })
            .filter(|d| {
                !config
                    .excluded_items
                    .iter()
                    .any(|needle| d.identifier.contains(needle.as_str()))
            })
            .map(|d| d.identifier.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<ItemDescriptor> {
        vec![
            ItemDescriptor::new("SwordShort", ItemCategory::Weapon).with_path(["Weapons", "Swords"]),
            ItemDescriptor::new("SwordLong", ItemCategory::Weapon).with_path(["Weapons", "Swords"]),
            ItemDescriptor::new("DaggerCommon", ItemCategory::Weapon)
                .with_path(["Weapons", "Daggers"]),
            ItemDescriptor::new("SwordDev", ItemCategory::Weapon)
                .with_path(["Weapons", "Swords"])
                .with_purchasable(false),
            ItemDescriptor::new("QuiverArrows", ItemCategory::Quiver).with_path(["Quivers"]),
            ItemDescriptor::new("PotionHealth", ItemCategory::Potion).with_path(["Potions"]),
            ItemDescriptor::new("ShieldRound", ItemCategory::Shield).with_path(["Shields"]),
        ]
    }

    fn ids(pool: &EligiblePool) -> Vec<&str> {
        pool.iter().collect()
    }

    #[test]
    fn unrestricted_pool_keeps_only_purchasable_items_in_order() {
        let (pool, report) = CatalogFilter::apply(&catalog(), &FilterConfig::default());
        assert_eq!(
            ids(&pool),
            [
                "SwordShort",
                "SwordLong",
                "DaggerCommon",
                "QuiverArrows",
                "PotionHealth",
                "ShieldRound"
            ]
        );
        assert_eq!(report.base_size, 6);
        assert!(report.category_fallback.is_none());
    }

    #[test]
    fn category_restricts_base_pool() {
        let config = FilterConfig::default().with_category(Some(ItemCategory::Weapon));
        let (pool, _) = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(ids(&pool), ["SwordShort", "SwordLong", "DaggerCommon"]);
    }

    #[test]
    fn out_of_range_category_falls_back_to_any() {
        let config = FilterConfig::default().with_category(CategorySelector::from_index(9));
        let (pool, report) = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(pool.len(), 6);
        assert_eq!(
            report.category_fallback,
            Some(ConfigurationError::CategoryOutOfRange(9))
        );
    }

    #[test]
    fn negative_category_index_is_unrestricted_without_fallback() {
        assert_eq!(CategorySelector::from_index(-1), CategorySelector::Any);
        let config = FilterConfig::default().with_category(CategorySelector::from_index(-1));
        let (_, report) = CatalogFilter::apply(&catalog(), &config);
        assert!(report.category_fallback.is_none());
    }

    #[test]
    fn exclusions_remove_tag_and_identifier_matches() {
        let config = FilterConfig::default().excluding(["Dagger"], ["Potion", "Round"]);
        let (pool, _) = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(ids(&pool), ["SwordShort", "SwordLong", "QuiverArrows"]);
        for excluded in ["DaggerCommon", "PotionHealth", "ShieldRound"] {
            assert!(!pool.contains(excluded));
        }
    }

    #[test]
    fn override_items_only_keeps_base_members_in_listed_order() {
        let config = FilterConfig::default().overriding(
            None,
            ["ShieldRound", "SwordDev", "Missing", "SwordShort", "ShieldRound"],
        );
        let (pool, report) = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(ids(&pool), ["ShieldRound", "SwordShort"]);
        assert_eq!(report.rejected_overrides, ["SwordDev", "Missing"]);
    }

    #[test]
    fn override_tag_selects_then_items_append_without_duplicates() {
        let config =
            FilterConfig::default().overriding(Some("Sword"), ["PotionHealth", "SwordLong"]);
        let (pool, _) = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(ids(&pool), ["SwordShort", "SwordLong", "PotionHealth"]);
    }

    #[test]
    fn empty_override_tag_is_ignored() {
        let config = FilterConfig::default().overriding(Some(""), ["QuiverArrows"]);
        let (pool, _) = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(ids(&pool), ["QuiverArrows"]);
    }

    #[test]
    fn override_mode_ignores_exclusion_lists() {
        let mut config = FilterConfig::default().overriding(Some("Swords"), Vec::<String>::new());
        config.excluded_categories = vec!["Swords".into()];
        let (pool, _) = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(ids(&pool), ["SwordShort", "SwordLong"]);
    }

    #[test]
    fn filtering_is_deterministic() {
        let config = FilterConfig::default()
            .with_category(Some(ItemCategory::Weapon))
            .excluding(["Daggers"], ["Long"]);
        let first = CatalogFilter::apply(&catalog(), &config);
        let second = CatalogFilter::apply(&catalog(), &config);
        assert_eq!(first, second);
        assert_eq!(ids(&first.0), ["SwordShort"]);
    }
}
