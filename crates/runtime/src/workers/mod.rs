//! Worker tasks that back the runtime orchestration.
//!
//! The dispenser worker owns one container's state machine and scene
//! objects; the task spawner feeds asynchronous instantiations back into it.

mod dispenser;
mod spawner;

pub use dispenser::{Command, DispenserWorker};
pub(crate) use spawner::TaskSpawner;
