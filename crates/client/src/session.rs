//! Scripted removal session over one or more bag modules.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use holding_content::{BagModuleSpec, ContentFactory};
use holding_core::{CatalogOracle, ContainerId, ItemId};
use holding_runtime::{
    CatalogInstanceFactory, CatalogOracleImpl, DispenserHandle, DispenserSnapshot, Event,
    EventBus, Runtime, RuntimeConfig, RuntimeError, Topic,
};

use crate::config::ClientConfig;

/// Grace period for a spawn to land on top of the configured latency.
const STOCK_GRACE: Duration = Duration::from_secs(2);

/// What happened to one bag during the session.
#[derive(Debug, Clone, Serialize)]
pub struct BagReport {
    pub bag: String,
    pub base_size: usize,
    pub eligible_size: usize,
    pub category_fallback: bool,
    pub rejected_overrides: Vec<ItemId>,
    /// Items taken out of the bag, in order.
    pub taken: Vec<ItemId>,
    pub final_status: DispenserSnapshot,
}

/// Runs the configured removals against each selected bag in turn.
pub async fn run_session(config: &ClientConfig) -> Result<Vec<BagReport>> {
    let content = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    info!("Loading content from {}", content.data_dir().display());

    let catalog: Arc<dyn CatalogOracle> =
        Arc::new(CatalogOracleImpl::from_descriptors(content.load_items()?));
    let modules = select_modules(content.load_modules()?, config.bag_id.as_deref())?;

    let mut reports = Vec::with_capacity(modules.len());
    for (index, module) in modules.iter().enumerate() {
        let container = ContainerId(index as u32);
        let report = run_bag(config, Arc::clone(&catalog), module, container)
            .await
            .with_context(|| format!("bag '{}' failed", module.id))?;
        reports.push(report);
    }

    Ok(reports)
}

fn select_modules(
    modules: Vec<BagModuleSpec>,
    bag_id: Option<&str>,
) -> Result<Vec<BagModuleSpec>> {
    let Some(bag_id) = bag_id else {
        return Ok(modules);
    };

    let selected: Vec<_> = modules.into_iter().filter(|m| m.id == bag_id).collect();
    if selected.is_empty() {
        anyhow::bail!("bag module '{}' not found", bag_id);
    }
    Ok(selected)
}

async fn run_bag(
    config: &ClientConfig,
    catalog: Arc<dyn CatalogOracle>,
    module: &BagModuleSpec,
    container: ContainerId,
) -> Result<BagReport> {
    let bus = EventBus::new();
    let mut stock = bus.subscribe(Topic::Stock);

    let runtime = Runtime::builder()
        .shared_catalog(catalog)
        .module(module)
        .factory(CatalogInstanceFactory::with_latency(config.spawn_latency))
        .config(RuntimeConfig {
            container,
            session_seed: config.session_seed,
            ..RuntimeConfig::default()
        })
        .event_bus(bus)
        .build()
        .await?;

    let filter = runtime.filter_report().clone();
    info!(
        bag = %module.id,
        %container,
        eligible = filter.eligible_size,
        "bag stocked"
    );

    let handle = runtime.handle();
    let wait = config.spawn_latency + STOCK_GRACE;
    let mut taken = Vec::new();

    for _ in 0..config.removals {
        let snapshot = handle.status().await?;
        if snapshot.status.state.is_terminal() {
            break;
        }
        if snapshot.occupant.is_none() && !wait_for_stock(&handle, &mut stock, wait).await? {
            warn!(bag = %module.id, "bag left empty, stopping early");
            break;
        }

        match handle.unseat().await {
            Ok(Some(item)) => {
                info!(bag = %module.id, instance = %item.id, item = %item.item, "took item");
                taken.push(item.item);
            }
            Ok(None) => break,
            Err(RuntimeError::SlotLocked(_) | RuntimeError::ContainerDespawned(_)) => break,
            Err(e) => return Err(e.into()),
        }
    }

    let final_status = handle.status().await?;
    drop(handle);
    runtime.shutdown().await?;

    Ok(BagReport {
        bag: module.id.clone(),
        base_size: filter.base_size,
        eligible_size: filter.eligible_size,
        category_fallback: filter.category_fallback.is_some(),
        rejected_overrides: filter.rejected_overrides,
        taken,
        final_status,
    })
}

/// Waits for the slot to be stocked. `false` if no spawn is left to wait for
/// or the wait timed out.
async fn wait_for_stock(
    handle: &DispenserHandle,
    stock: &mut broadcast::Receiver<Event>,
    wait: Duration,
) -> Result<bool> {
    match tokio::time::timeout(wait, poll_stock(handle, stock)).await {
        Ok(stocked) => Ok(stocked?),
        Err(_) => Ok(false),
    }
}

async fn poll_stock(
    handle: &DispenserHandle,
    stock: &mut broadcast::Receiver<Event>,
) -> holding_runtime::Result<bool> {
    loop {
        // Buffered events may predate the last removal, so the snapshot
        // decides and events only wake the loop.
        let snapshot = handle.status().await?;
        if snapshot.occupant.is_some() {
            return Ok(true);
        }
        if !snapshot.status.spawn_in_flight {
            return Ok(false);
        }

        match stock.recv().await {
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "stock events lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return Ok(false),
        }
    }
}
