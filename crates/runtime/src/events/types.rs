//! Event types for different topics.

use holding_core::{
    ContainerId, IgnoreReason, InstanceId, ItemId, ItemInstance, UsageBudget,
};
use serde::{Deserialize, Serialize};

/// Events about what the container is stocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEvent {
    /// An instantiation was handed to the instance factory.
    SpawnRequested {
        container: ContainerId,
        ticket: u64,
        item: ItemId,
    },

    /// A spawned instance now occupies the attachment point.
    Seated {
        container: ContainerId,
        instance: ItemInstance,
    },

    /// A spawned instance was thrown away instead of seated.
    Discarded {
        container: ContainerId,
        instance: ItemInstance,
        reason: DiscardReason,
    },

    /// The drawn identifier has no catalog descriptor; the slot stays empty.
    LookupMiss { container: ContainerId, item: ItemId },

    /// The occupant was removed and one restock grant was spent.
    Restocked {
        container: ContainerId,
        removed: InstanceId,
        budget: UsageBudget,
    },

    /// A removal produced no restock.
    RemovalIgnored {
        container: ContainerId,
        removed: InstanceId,
        reason: IgnoreReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiscardReason {
    /// Something else took the slot while the spawn was in flight.
    SlotOccupied,
    /// The container locked or despawned while the spawn was in flight.
    ContainerInactive,
}

/// Container lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Initialized {
        container: ContainerId,
        pool_size: usize,
        budget: UsageBudget,
    },
    /// Budget exhausted; the attachment point no longer accepts interaction.
    Locked { container: ContainerId },
    /// The container asked to be destroyed after locking.
    Despawned { container: ContainerId },
}
