/// Per-dispenser usage settings, fixed at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispenserSettings {
    /// Total items the dispenser hands out, including the initial one.
    /// Zero or negative means unlimited.
    pub capacity: i64,
    /// Destroy the container once it locks.
    pub despawn_on_empty: bool,
}

impl DispenserSettings {
    pub const UNLIMITED: i64 = 0;

    pub fn new(capacity: i64, despawn_on_empty: bool) -> Self {
        Self {
            capacity,
            despawn_on_empty,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Self::UNLIMITED, false)
    }
}
