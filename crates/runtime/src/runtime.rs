//! High-level runtime orchestrator.
//!
//! The runtime builds the eligible pool, initializes the dispenser, spawns its
//! worker, and exposes a builder-based API for clients to drive the container.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use holding_content::BagModuleSpec;
use holding_core::{
    CatalogFilter, CatalogOracle, ContainerId, Dispenser, DispenserSettings, FilterConfig,
    FilterReport,
};

use crate::api::{
    CatalogInstanceFactory, DispenserHandle, InstanceFactory, Result, RuntimeError,
};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::workers::{DispenserWorker, TaskSpawner};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub container: ContainerId,
    /// Seed for restock draws; a fixed seed replays the same picks.
    pub session_seed: u64,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            container: ContainerId::default(),
            session_seed: 0,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Runtime hosting one dispenser container.
///
/// [`DispenserHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: DispenserHandle,
    filter_report: FilterReport,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> DispenserHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Diagnostics from building the eligible pool.
    pub fn filter_report(&self) -> &FilterReport {
        &self.filter_report
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker exits once every handle clone is dropped and any in-flight
    /// spawn has completed.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<dyn CatalogOracle>>,
    filter: FilterConfig,
    settings: DispenserSettings,
    factory: Option<Arc<dyn InstanceFactory>>,
    event_bus: Option<EventBus>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            filter: FilterConfig::default(),
            settings: DispenserSettings::unlimited(),
            factory: None,
            event_bus: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required item catalog
    pub fn catalog(self, catalog: impl CatalogOracle + 'static) -> Self {
        self.shared_catalog(Arc::new(catalog))
    }

    /// Set a catalog shared with other runtimes
    pub fn shared_catalog(mut self, catalog: Arc<dyn CatalogOracle>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn settings(mut self, settings: DispenserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Take filter and settings from a bag module.
    pub fn module(self, module: &BagModuleSpec) -> Self {
        self.filter(module.filter_config()).settings(module.settings())
    }

    /// Set the instance factory (defaults to [`CatalogInstanceFactory`]).
    pub fn factory(mut self, factory: impl InstanceFactory + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn session_seed(mut self, seed: u64) -> Self {
        self.config.session_seed = seed;
        self
    }

    /// Publish to an existing bus, so subscribers see initialization events.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Build the runtime and issue the initial stocking.
    ///
    /// # Errors
    ///
    /// Fails without spawning anything if no catalog was set or the filter
    /// leaves the pool empty.
    pub async fn build(self) -> Result<Runtime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let config = self.config;

        let (pool, filter_report) = CatalogFilter::build(catalog.as_ref(), &self.filter);
        let dispenser = Dispenser::new(config.container, pool, self.settings, config.session_seed)?;

        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(config.event_buffer_size));
        let factory = self
            .factory
            .unwrap_or_else(|| Arc::new(CatalogInstanceFactory::new()) as Arc<dyn InstanceFactory>);

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let spawner = TaskSpawner::new(factory, command_tx.downgrade());

        let mut worker = DispenserWorker::new(
            dispenser,
            OracleManager::new(catalog),
            spawner,
            command_rx,
            event_bus.clone(),
        );
        worker.initialize()?;

        let worker_handle = tokio::spawn(worker.run());
        let handle = DispenserHandle::new(command_tx, event_bus);

        Ok(Runtime {
            handle,
            filter_report,
            worker_handle,
        })
    }
}
