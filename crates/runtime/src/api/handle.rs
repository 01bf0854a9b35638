//! Cloneable façade for issuing commands to a dispenser worker.
//!
//! [`DispenserHandle`] hides channel plumbing and offers async helpers for
//! interacting with the container's attachment point or streaming events
//! from specific topics.
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use holding_core::{DispenserStatus, ItemInstance};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Dispenser status together with the attachment point it stocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenserSnapshot {
    pub status: DispenserStatus,
    pub occupant: Option<ItemInstance>,
    pub slot_locked: bool,
    pub destruction_requested: bool,
}

/// Client-facing handle to interact with one dispenser container
#[derive(Clone)]
pub struct DispenserHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl DispenserHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Take the current occupant out of the attachment point.
    ///
    /// Returns `Ok(None)` if the slot was empty. Removing an occupant is what
    /// triggers a restock (or locks the container once its budget is spent).
    pub async fn unseat(&self) -> Result<Option<ItemInstance>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Unseat { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Put an item into the attachment point from outside the dispenser.
    pub async fn place(&self, instance: ItemInstance) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Place {
                instance,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Query the current dispenser status (read-only snapshot)
    pub async fn status(&self) -> Result<DispenserSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryStatus { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Stock` - Spawn requests, seating, discards and lookup misses
    /// - `Topic::Lifecycle` - Initialization, lock and despawn
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
