//! Typed results of dispenser operations.
//!
//! Nothing here is an error: every variant is an expected path of the state
//! machine, surfaced so the host can publish it.
use crate::budget::UsageBudget;
use crate::catalog::{ItemDescriptor, ItemId, ItemInstance};

use super::ContainerId;

/// An instantiation the spawner must carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnRequest {
    pub container: ContainerId,
    /// Sequence number of this request within the container.
    pub ticket: u64,
    pub descriptor: ItemDescriptor,
}

impl SpawnRequest {
    pub fn identifier(&self) -> &str {
        &self.descriptor.identifier
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestockOutcome {
    /// The request was handed to the spawner; the guard is now set.
    Requested(SpawnRequest),
    /// Another spawn is outstanding; nothing changed.
    SpawnPending,
    /// The chosen identifier has no catalog descriptor; nothing changed.
    LookupMiss { identifier: ItemId },
    /// The container is no longer active.
    Inactive,
}

impl RestockOutcome {
    pub fn is_requested(&self) -> bool {
        matches!(self, Self::Requested(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeatOutcome {
    Seated { instance: ItemInstance },
    /// The slot was occupied when the spawn completed; the host should
    /// dispose of the instance.
    Discarded { instance: ItemInstance },
    /// The container locked or despawned while the spawn was outstanding.
    Inactive { instance: ItemInstance },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IgnoreReason {
    SpawnPending,
    NotInitialized,
    Terminal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovalOutcome {
    Ignored(IgnoreReason),
    /// A restock was attempted and one grant consumed.
    Restocked {
        restock: RestockOutcome,
        budget: UsageBudget,
    },
    Locked,
    Despawned,
}
