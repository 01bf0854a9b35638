//! Host-side stand-ins for the scene objects a dispenser drives.
use holding_core::{AttachmentPoint, ContainerLifetime, ItemInstance};

/// Single-occupant attachment point owned by the dispenser worker.
#[derive(Debug, Clone, Default)]
pub struct HolderSlot {
    occupant: Option<ItemInstance>,
    locked: bool,
}

impl HolderSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self) -> Option<&ItemInstance> {
        self.occupant.as_ref()
    }

    /// Detach the current occupant, if any.
    pub fn take(&mut self) -> Option<ItemInstance> {
        self.occupant.take()
    }
}

impl AttachmentPoint for HolderSlot {
    fn has_free_slot(&self) -> bool {
        !self.locked && self.occupant.is_none()
    }

    fn seat(&mut self, instance: ItemInstance) {
        self.occupant = Some(instance);
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Records that the container asked to be destroyed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerLifetimeFlag {
    destruction_requested: bool,
}

impl ContainerLifetimeFlag {
    pub fn destruction_requested(&self) -> bool {
        self.destruction_requested
    }
}

impl ContainerLifetime for ContainerLifetimeFlag {
    fn request_destruction(&mut self) {
        self.destruction_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holding_core::InstanceId;

    #[test]
    fn locked_slot_is_never_free() {
        let mut slot = HolderSlot::new();
        assert!(slot.has_free_slot());

        slot.set_locked(true);
        assert!(!slot.has_free_slot());
        assert!(slot.is_locked());
    }

    #[test]
    fn take_frees_the_slot() {
        let mut slot = HolderSlot::new();
        slot.seat(ItemInstance::new(InstanceId(7), "Apple"));
        assert!(!slot.has_free_slot());

        let taken = slot.take().unwrap();
        assert_eq!(taken.id, InstanceId(7));
        assert!(slot.has_free_slot());
        assert!(slot.take().is_none());
    }
}
