//! Collaborator contracts the dispenser is driven through.
//!
//! The dispenser never touches a scene directly. The host supplies the item
//! catalog, an instantiation service, the attachment point that physically
//! holds the stocked item and the container's lifetime control; the
//! [`DispenserEnv`] aggregate bundles them for a single call.
mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed};

use crate::catalog::{CatalogOracle, ItemInstance};
use crate::dispenser::SpawnRequest;

/// Issues asynchronous instantiation requests.
///
/// `instantiate` returns immediately. The host must later hand the produced
/// instance to [`crate::Dispenser::complete_spawn`] exactly once per request.
/// Requests cannot be cancelled; a request that never completes leaves the
/// dispenser unable to restock.
pub trait ItemSpawner: Send + Sync {
    fn instantiate(&self, request: SpawnRequest);
}

/// The single-occupant slot the dispenser stocks.
///
/// Hosts report detachment by calling
/// [`crate::Dispenser::on_occupant_removed`]; the slot itself only answers
/// occupancy queries and accepts seats.
pub trait AttachmentPoint {
    fn has_free_slot(&self) -> bool;

    fn seat(&mut self, instance: ItemInstance);

    /// A locked slot accepts no further interaction.
    fn set_locked(&mut self, locked: bool);

    fn is_locked(&self) -> bool;
}

/// Lifetime control of the container that owns the dispenser.
pub trait ContainerLifetime {
    fn request_destruction(&mut self);
}

/// Collaborators borrowed for one dispenser operation.
pub struct DispenserEnv<'a> {
    pub catalog: &'a dyn CatalogOracle,
    pub spawner: &'a dyn ItemSpawner,
    pub holder: &'a mut dyn AttachmentPoint,
    pub lifetime: &'a mut dyn ContainerLifetime,
    pub rng: &'a dyn RngOracle,
}

impl<'a> DispenserEnv<'a> {
    pub fn new(
        catalog: &'a dyn CatalogOracle,
        spawner: &'a dyn ItemSpawner,
        holder: &'a mut dyn AttachmentPoint,
        lifetime: &'a mut dyn ContainerLifetime,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self {
            catalog,
            spawner,
            holder,
            lifetime,
            rng,
        }
    }
}
