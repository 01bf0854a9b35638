use std::sync::atomic::{AtomicBool, Ordering};

/// At-most-one outstanding spawn request.
///
/// Acquisition is a single test-and-set, so the invariant holds even when a
/// host dispatches container events from more than one thread.
#[derive(Debug, Default)]
pub struct SpawnGuard {
    in_flight: AtomicBool,
}

impl SpawnGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a spawn as outstanding. Returns `false` if one already was.
    pub fn try_acquire(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}
