//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from dispenser construction and worker coordination so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use holding_core::{ContainerId, DispenserError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a catalog to be configured before building")]
    MissingCatalog,

    #[error(transparent)]
    Dispenser(#[from] DispenserError),

    #[error("dispenser worker command channel closed")]
    CommandChannelClosed,

    #[error("dispenser worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("dispenser worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("{0} has despawned")]
    ContainerDespawned(ContainerId),

    #[error("{0} attachment point is locked")]
    SlotLocked(ContainerId),

    #[error("{0} attachment point is occupied")]
    SlotOccupied(ContainerId),
}
