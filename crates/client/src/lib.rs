//! Composition root for the `holding-bag` binary.
//!
//! Loads bag content, boots one dispenser runtime per bag module and drives a
//! scripted sequence of occupant removals against it.
pub mod config;
pub mod logging;
pub mod session;

pub use config::ClientConfig;
pub use session::{BagReport, run_session};
