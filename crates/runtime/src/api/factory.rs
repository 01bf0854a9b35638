//! Asynchronous abstraction for turning catalog descriptors into live items.
//!
//! Runtime users plug in [`InstanceFactory`] implementations so the dispenser
//! can stock a real scene, a scripted fixture, or a latency simulation.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use holding_core::{InstanceId, ItemDescriptor, ItemInstance};

/// Trait for materializing an item from its descriptor.
///
/// Called from a detached task; the dispenser keeps its spawn guard set until
/// the returned instance is delivered back to it.
#[async_trait]
pub trait InstanceFactory: Send + Sync {
    async fn instantiate(&self, descriptor: &ItemDescriptor) -> ItemInstance;
}

/// Factory that hands out sequential instance ids, optionally after a delay.
#[derive(Debug, Default)]
pub struct CatalogInstanceFactory {
    next_id: AtomicU64,
    latency: Option<Duration>,
}

impl CatalogInstanceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate load time before each instance becomes available.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            latency: Some(latency).filter(|d| !d.is_zero()),
        }
    }
}

#[async_trait]
impl InstanceFactory for CatalogInstanceFactory {
    async fn instantiate(&self, descriptor: &ItemDescriptor) -> ItemInstance {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let id = InstanceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        ItemInstance::new(id, descriptor.identifier.clone())
    }
}
