//! Minimal [`holding_core::CatalogOracle`] backed by an in-memory map.
use std::collections::HashMap;

use holding_core::{CatalogOracle, ItemDescriptor, ItemId};

/// CatalogOracle implementation with static item descriptors.
///
/// Identifiers enumerate in insertion order. Re-adding an identifier
/// replaces its descriptor but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct CatalogOracleImpl {
    order: Vec<ItemId>,
    descriptors: HashMap<ItemId, ItemDescriptor>,
}

impl CatalogOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ItemDescriptor>) -> Self {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.add_descriptor(descriptor);
        }
        catalog
    }

    /// Add an item descriptor
    pub fn add_descriptor(&mut self, descriptor: ItemDescriptor) {
        let identifier = descriptor.identifier.clone();
        if self.descriptors.insert(identifier.clone(), descriptor).is_none() {
            self.order.push(identifier);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl CatalogOracle for CatalogOracleImpl {
    fn identifiers(&self) -> Vec<ItemId> {
        self.order.clone()
    }

    fn descriptor(&self, identifier: &str) -> Option<ItemDescriptor> {
        self.descriptors.get(identifier).cloned()
    }
}
