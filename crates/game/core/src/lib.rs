//! Item dispenser logic shared by hosts and content tooling.
//!
//! `holding-core` defines the pure parts of a restocking container: the
//! catalog vocabulary, the filter that turns a catalog into an eligible pool,
//! usage budgets, and the [`Dispenser`] state machine. Nothing here performs
//! I/O or awaits; hosts drive the dispenser through the collaborator traits in
//! [`env`].
pub mod budget;
pub mod catalog;
pub mod config;
pub mod dispenser;
pub mod env;
pub mod filter;

pub use budget::UsageBudget;
pub use catalog::{CatalogOracle, InstanceId, ItemCategory, ItemDescriptor, ItemId, ItemInstance};
pub use config::DispenserSettings;
pub use dispenser::{
    ContainerId, ContainerState, Dispenser, DispenserError, DispenserStatus, IgnoreReason,
    RemovalOutcome, RestockOutcome, SeatOutcome, SpawnGuard, SpawnRequest,
};
pub use env::{
    AttachmentPoint, ContainerLifetime, DispenserEnv, ItemSpawner, PcgRng, RngOracle,
    compute_seed,
};
pub use filter::{
    CatalogFilter, CategorySelector, ConfigurationError, EligiblePool, FilterConfig, FilterReport,
};
