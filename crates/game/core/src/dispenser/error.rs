use super::ContainerId;

/// Errors returned synchronously by the dispenser.
///
/// Lookup misses and slot races are not errors; they are reported through
/// the operation outcomes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispenserError {
    /// Filtering left nothing to draw from.
    #[error("{container} has an empty eligible pool")]
    EmptyPool { container: ContainerId },

    #[error("{container} is already initialized")]
    AlreadyInitialized { container: ContainerId },
}
