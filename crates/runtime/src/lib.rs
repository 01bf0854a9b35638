//! Async host for item dispensers.
//!
//! This crate wires the pure [`holding_core::Dispenser`] state machine to an
//! in-memory catalog, an asynchronous instance factory, and a worker task per
//! container. Consumers embed [`Runtime`] to stock a container, subscribe to
//! events, and interact with its attachment point through [`DispenserHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] and [`scene`] provide adapters for the dispenser collaborators
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;
pub mod scene;

mod workers;

pub use api::{
    CatalogInstanceFactory, DispenserHandle, DispenserSnapshot, InstanceFactory, Result,
    RuntimeError,
};
pub use events::{DiscardReason, Event, EventBus, LifecycleEvent, StockEvent, Topic};
pub use oracle::{CatalogOracleImpl, OracleManager};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scene::{ContainerLifetimeFlag, HolderSlot};
