//! [`ItemSpawner`] that instantiates on detached tokio tasks.
use std::sync::Arc;

use holding_core::{ItemSpawner, SpawnRequest};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::Command;
use crate::api::InstanceFactory;

/// Runs the instance factory off the worker and posts the result back as
/// [`Command::SpawnCompleted`].
///
/// Holds only a weak sender so the command channel still closes once every
/// [`crate::DispenserHandle`] is gone.
pub(crate) struct TaskSpawner {
    factory: Arc<dyn InstanceFactory>,
    command_tx: mpsc::WeakSender<Command>,
}

impl TaskSpawner {
    pub(crate) fn new(factory: Arc<dyn InstanceFactory>, command_tx: mpsc::WeakSender<Command>) -> Self {
        Self {
            factory,
            command_tx,
        }
    }
}

impl ItemSpawner for TaskSpawner {
    fn instantiate(&self, request: SpawnRequest) {
        let Some(command_tx) = self.command_tx.upgrade() else {
            warn!(
                container = %request.container,
                ticket = request.ticket,
                "command channel closed, spawn request dropped"
            );
            return;
        };

        let factory = Arc::clone(&self.factory);
        tokio::spawn(async move {
            let instance = factory.instantiate(&request.descriptor).await;
            let completed = Command::SpawnCompleted {
                ticket: request.ticket,
                instance,
            };
            if command_tx.send(completed).await.is_err() {
                debug!(container = %request.container, ticket = request.ticket, "worker gone before spawn completed");
            }
        });
    }
}
