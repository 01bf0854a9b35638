//! Dispenser worker that owns one container's [`holding_core::Dispenser`].
//!
//! Receives commands from [`DispenserHandle`](crate::DispenserHandle) and the
//! task spawner, drives the state machine, and publishes events to the
//! EventBus. Commands are processed one at a time, so every dispenser call
//! runs on a single logical thread.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use holding_core::{
    AttachmentPoint, Dispenser, DispenserEnv, ItemInstance, RemovalOutcome, RestockOutcome,
    SeatOutcome,
};

use crate::api::{DispenserSnapshot, Result, RuntimeError};
use crate::events::{DiscardReason, Event, EventBus, LifecycleEvent, StockEvent};
use crate::oracle::OracleManager;
use crate::scene::{ContainerLifetimeFlag, HolderSlot};

use super::TaskSpawner;

/// Commands that can be sent to the dispenser worker
pub enum Command {
    /// Take the occupant out of the attachment point.
    Unseat {
        reply: oneshot::Sender<Result<Option<ItemInstance>>>,
    },
    /// Put an item into the attachment point from outside the dispenser.
    Place {
        instance: ItemInstance,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the current status (read-only).
    QueryStatus {
        reply: oneshot::Sender<DispenserSnapshot>,
    },
    /// An instantiation requested by the dispenser has finished.
    SpawnCompleted { ticket: u64, instance: ItemInstance },
}

/// Background task that processes dispenser commands.
pub struct DispenserWorker {
    dispenser: Dispenser,
    oracles: OracleManager,
    spawner: TaskSpawner,
    holder: HolderSlot,
    lifetime: ContainerLifetimeFlag,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl DispenserWorker {
    pub(crate) fn new(
        dispenser: Dispenser,
        oracles: OracleManager,
        spawner: TaskSpawner,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            dispenser,
            oracles,
            spawner,
            holder: HolderSlot::new(),
            lifetime: ContainerLifetimeFlag::default(),
            command_rx,
            event_bus,
        }
    }

    /// Issues the initial stocking. Must run once, before [`Self::run`].
    pub(crate) fn initialize(&mut self) -> Result<()> {
        let env = DispenserEnv::new(
            self.oracles.catalog(),
            &self.spawner,
            &mut self.holder,
            &mut self.lifetime,
            self.oracles.rng(),
        );
        let outcome = self.dispenser.initialize(&env)?;

        let status = self.dispenser.status();
        self.event_bus
            .publish(Event::Lifecycle(LifecycleEvent::Initialized {
                container: status.container,
                pool_size: status.pool_size,
                budget: status.budget,
            }));
        self.publish_restock(&outcome);

        Ok(())
    }

    /// Main worker loop. Ends when every command sender is gone.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        debug!(container = %self.dispenser.container(), "dispenser worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Unseat { reply } => {
                let result = self.handle_unseat();
                if reply.send(result).is_err() {
                    debug!("Unseat reply channel closed (caller dropped)");
                }
            }
            Command::Place { instance, reply } => {
                let result = self.handle_place(instance);
                if reply.send(result).is_err() {
                    debug!("Place reply channel closed (caller dropped)");
                }
            }
            Command::QueryStatus { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("QueryStatus reply channel closed (caller dropped)");
                }
            }
            Command::SpawnCompleted { ticket, instance } => {
                self.handle_spawn_completed(ticket, instance);
            }
        }
    }

    /// Detaches the occupant and reports the removal to the dispenser.
    fn handle_unseat(&mut self) -> Result<Option<ItemInstance>> {
        let container = self.dispenser.container();
        if self.lifetime.destruction_requested() {
            return Err(RuntimeError::ContainerDespawned(container));
        }
        if self.holder.is_locked() {
            return Err(RuntimeError::SlotLocked(container));
        }

        let Some(removed) = self.holder.take() else {
            return Ok(None);
        };

        let mut env = DispenserEnv::new(
            self.oracles.catalog(),
            &self.spawner,
            &mut self.holder,
            &mut self.lifetime,
            self.oracles.rng(),
        );
        let outcome = self.dispenser.on_occupant_removed(&removed, &mut env);
        self.publish_removal(&removed, outcome);

        Ok(Some(removed))
    }

    fn handle_place(&mut self, instance: ItemInstance) -> Result<()> {
        let container = self.dispenser.container();
        if self.lifetime.destruction_requested() {
            return Err(RuntimeError::ContainerDespawned(container));
        }
        if self.holder.is_locked() {
            return Err(RuntimeError::SlotLocked(container));
        }
        if !self.holder.has_free_slot() {
            return Err(RuntimeError::SlotOccupied(container));
        }

        debug!(container = %container, instance = %instance.id, item = %instance.item, "placed externally");
        self.holder.seat(instance);
        Ok(())
    }

    fn handle_spawn_completed(&mut self, ticket: u64, instance: ItemInstance) {
        let container = self.dispenser.container();
        debug!(container = %container, ticket, instance = %instance.id, "spawn completed");

        let event = match self.dispenser.complete_spawn(instance, &mut self.holder) {
            SeatOutcome::Seated { instance } => StockEvent::Seated {
                container,
                instance,
            },
            SeatOutcome::Discarded { instance } => StockEvent::Discarded {
                container,
                instance,
                reason: DiscardReason::SlotOccupied,
            },
            SeatOutcome::Inactive { instance } => StockEvent::Discarded {
                container,
                instance,
                reason: DiscardReason::ContainerInactive,
            },
        };
        self.event_bus.publish(Event::Stock(event));
    }

    fn publish_restock(&self, outcome: &RestockOutcome) {
        let container = self.dispenser.container();
        let event = match outcome {
            RestockOutcome::Requested(request) => StockEvent::SpawnRequested {
                container,
                ticket: request.ticket,
                item: request.identifier().to_owned(),
            },
            RestockOutcome::LookupMiss { identifier } => StockEvent::LookupMiss {
                container,
                item: identifier.clone(),
            },
            RestockOutcome::SpawnPending | RestockOutcome::Inactive => return,
        };
        self.event_bus.publish(Event::Stock(event));
    }

    fn publish_removal(&self, removed: &ItemInstance, outcome: RemovalOutcome) {
        let container = self.dispenser.container();
        match outcome {
            RemovalOutcome::Ignored(reason) => {
                self.event_bus.publish(Event::Stock(StockEvent::RemovalIgnored {
                    container,
                    removed: removed.id,
                    reason,
                }));
            }
            RemovalOutcome::Restocked { restock, budget } => {
                self.event_bus.publish(Event::Stock(StockEvent::Restocked {
                    container,
                    removed: removed.id,
                    budget,
                }));
                self.publish_restock(&restock);
            }
            RemovalOutcome::Locked => {
                self.event_bus
                    .publish(Event::Lifecycle(LifecycleEvent::Locked { container }));
            }
            RemovalOutcome::Despawned => {
                self.event_bus
                    .publish(Event::Lifecycle(LifecycleEvent::Locked { container }));
                self.event_bus
                    .publish(Event::Lifecycle(LifecycleEvent::Despawned { container }));
                info!(container = %container, "container deregistered, removals no longer accepted");
            }
        }
    }

    fn snapshot(&self) -> DispenserSnapshot {
        DispenserSnapshot {
            status: self.dispenser.status(),
            occupant: self.holder.occupant().cloned(),
            slot_locked: self.holder.is_locked(),
            destruction_requested: self.lifetime.destruction_requested(),
        }
    }
}
