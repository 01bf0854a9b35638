//! Item catalog vocabulary shared by the filter, the dispenser and hosts.
//!
//! Descriptors are owned by whatever catalog backs a [`CatalogOracle`]; this
//! crate only ever reads them.

/// Catalog identifier of an item (e.g. `"SwordShortCommon"`).
pub type ItemId = String;

/// Physical item category.
///
/// The discriminants are the raw indices used by bag configuration files,
/// so the declaration order must not change.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::FromRepr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum ItemCategory {
    Misc = 0,
    Weapon = 1,
    Quiver = 2,
    Potion = 3,
    Prop = 4,
    Body = 5,
    Shield = 6,
}

impl ItemCategory {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// Decodes a raw configuration index. Returns `None` outside `0..=6`.
    pub fn from_index(index: i64) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::from_repr)
    }

    #[inline]
    pub fn as_index(self) -> u8 {
        self as u8
    }
}

/// Read-only metadata for one catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDescriptor {
    pub identifier: ItemId,
    pub category: ItemCategory,
    /// Ordered tag path, e.g. `["Weapons", "Swords", "Short"]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category_path: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub purchasable: bool,
}

impl ItemDescriptor {
    pub fn new(identifier: impl Into<ItemId>, category: ItemCategory) -> Self {
        Self {
            identifier: identifier.into(),
            category,
            category_path: Vec::new(),
            purchasable: true,
        }
    }

    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_purchasable(mut self, purchasable: bool) -> Self {
        self.purchasable = purchasable;
        self
    }

    /// True if any tag of the category path contains `needle`.
    pub fn path_contains(&self, needle: &str) -> bool {
        self.category_path.iter().any(|tag| tag.contains(needle))
    }
}

/// Host-assigned identity of a spawned item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live item produced by the catalog's instantiation request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub id: InstanceId,
    pub item: ItemId,
}

impl ItemInstance {
    pub fn new(id: InstanceId, item: impl Into<ItemId>) -> Self {
        Self {
            id,
            item: item.into(),
        }
    }
}

/// Read access to the item catalog.
pub trait CatalogOracle: Send + Sync {
    /// All physical item identifiers, in catalog order.
    fn identifiers(&self) -> Vec<ItemId>;

    fn descriptor(&self, identifier: &str) -> Option<ItemDescriptor>;
}
