//! Restock state machine of an item dispenser.
//!
//! A [`Dispenser`] keeps a single attachment point stocked with an item drawn
//! from its [`EligiblePool`]. It stocks once on [`Dispenser::initialize`] and
//! again every time the host reports the occupant was removed, until the
//! usage budget runs out and the container locks (or despawns).
//!
//! # Event flow
//!
//! ```text
//! initialize ─► request_restock ─► spawn_and_seat ─► ItemSpawner::instantiate
//!                     ▲                                        │ (async)
//!                     │                                        ▼
//! on_occupant_removed ┘                               complete_spawn ─► seat
//! ```
//!
//! At most one spawn is outstanding at a time. Removal events that arrive
//! while a spawn is outstanding are dropped, not queued.
mod error;
mod guard;
mod outcome;
mod state;

pub use error::DispenserError;
pub use guard::SpawnGuard;
pub use outcome::{IgnoreReason, RemovalOutcome, RestockOutcome, SeatOutcome, SpawnRequest};
pub use state::{ContainerId, ContainerState, DispenserStatus};

use tracing::{debug, info, warn};

use crate::budget::UsageBudget;
use crate::catalog::ItemInstance;
use crate::config::DispenserSettings;
use crate::env::{AttachmentPoint, DispenserEnv, compute_seed};
use crate::filter::EligiblePool;

pub struct Dispenser {
    container: ContainerId,
    pool: EligiblePool,
    settings: DispenserSettings,
    session_seed: u64,
    budget: UsageBudget,
    guard: SpawnGuard,
    state: ContainerState,
    initialized: bool,
    draws: u64,
    restocks_issued: u64,
}

impl Dispenser {
    /// Creates a dispenser over a pre-built pool.
    ///
    /// # Errors
    ///
    /// Returns [`DispenserError::EmptyPool`] if `pool` is empty: such a
    /// dispenser could never stock anything.
    pub fn new(
        container: ContainerId,
        pool: EligiblePool,
        settings: DispenserSettings,
        session_seed: u64,
    ) -> Result<Self, DispenserError> {
        if pool.is_empty() {
            return Err(DispenserError::EmptyPool { container });
        }

        Ok(Self {
            container,
            pool,
            budget: UsageBudget::from_capacity(settings.capacity),
            settings,
            session_seed,
            guard: SpawnGuard::new(),
            state: ContainerState::Active,
            initialized: false,
            draws: 0,
            restocks_issued: 0,
        })
    }

    /// Resets the budget and guard and issues the initial stocking.
    ///
    /// # Errors
    ///
    /// Returns [`DispenserError::AlreadyInitialized`] on a second call.
    pub fn initialize(
        &mut self,
        env: &DispenserEnv<'_>,
    ) -> Result<RestockOutcome, DispenserError> {
        if self.initialized {
            return Err(DispenserError::AlreadyInitialized {
                container: self.container,
            });
        }

        self.budget = UsageBudget::from_capacity(self.settings.capacity);
        self.state = ContainerState::Active;
        self.guard.release();
        self.initialized = true;

        info!(
            container = %self.container,
            pool = self.pool.len(),
            budget = %self.budget,
            "dispenser initialized"
        );

        Ok(self.request_restock(env))
    }

    /// Picks an identifier uniformly from the pool and spawns it.
    pub fn request_restock(&mut self, env: &DispenserEnv<'_>) -> RestockOutcome {
        if self.state.is_terminal() {
            return RestockOutcome::Inactive;
        }

        let seed = compute_seed(self.session_seed, self.draws, self.container.0, 0);
        self.draws += 1;

        // The pool is non-empty by construction.
        let index = env.rng.index(seed, self.pool.len());
        let identifier = self.pool.as_slice()[index].clone();

        debug!(container = %self.container, item = %identifier, draw = self.draws, "restock drawn");
        self.spawn_and_seat(&identifier, env)
    }

    /// Requests instantiation of `identifier` unless a spawn is outstanding
    /// or the catalog does not know the item.
    pub fn spawn_and_seat(
        &mut self,
        identifier: &str,
        env: &DispenserEnv<'_>,
    ) -> RestockOutcome {
        if self.state.is_terminal() {
            return RestockOutcome::Inactive;
        }
        if self.guard.is_set() {
            return RestockOutcome::SpawnPending;
        }

        let Some(descriptor) = env.catalog.descriptor(identifier) else {
            warn!(
                container = %self.container,
                item = identifier,
                "catalog has no descriptor, container left unstocked"
            );
            return RestockOutcome::LookupMiss {
                identifier: identifier.to_owned(),
            };
        };

        if !self.guard.try_acquire() {
            return RestockOutcome::SpawnPending;
        }

        let request = SpawnRequest {
            container: self.container,
            ticket: self.restocks_issued,
            descriptor,
        };
        self.restocks_issued += 1;

        debug!(container = %self.container, item = identifier, ticket = request.ticket, "spawn requested");
        env.spawner.instantiate(request.clone());

        RestockOutcome::Requested(request)
    }

    /// Delivers the instance produced by an earlier [`SpawnRequest`].
    ///
    /// Clears the spawn guard, then seats the instance if the slot is free.
    pub fn complete_spawn(
        &mut self,
        instance: ItemInstance,
        holder: &mut dyn AttachmentPoint,
    ) -> SeatOutcome {
        self.guard.release();

        if self.state.is_terminal() {
            debug!(container = %self.container, instance = %instance.id, "spawn completed after shutdown");
            return SeatOutcome::Inactive { instance };
        }

        if !holder.has_free_slot() {
            warn!(
                container = %self.container,
                instance = %instance.id,
                item = %instance.item,
                "slot occupied when spawn completed, discarding instance"
            );
            return SeatOutcome::Discarded { instance };
        }

        debug!(container = %self.container, instance = %instance.id, item = %instance.item, "seated");
        holder.seat(instance.clone());
        SeatOutcome::Seated { instance }
    }

    /// Reacts to the attachment point losing its occupant.
    pub fn on_occupant_removed(
        &mut self,
        removed: &ItemInstance,
        env: &mut DispenserEnv<'_>,
    ) -> RemovalOutcome {
        if !self.initialized {
            return RemovalOutcome::Ignored(IgnoreReason::NotInitialized);
        }
        if self.state.is_terminal() {
            return RemovalOutcome::Ignored(IgnoreReason::Terminal);
        }
        if self.guard.is_set() {
            debug!(container = %self.container, item = %removed.item, "removal ignored, spawn pending");
            return RemovalOutcome::Ignored(IgnoreReason::SpawnPending);
        }

        if self.budget.is_exhausted() {
            return self.lock(env);
        }

        debug!(container = %self.container, item = %removed.item, "occupant removed, restocking");
        let restock = self.request_restock(env);
        self.budget.consume();

        RemovalOutcome::Restocked {
            restock,
            budget: self.budget,
        }
    }

    fn lock(&mut self, env: &mut DispenserEnv<'_>) -> RemovalOutcome {
        env.holder.set_locked(true);
        self.state = ContainerState::Locked;
        info!(container = %self.container, "budget exhausted, container locked");

        if !self.settings.despawn_on_empty {
            return RemovalOutcome::Locked;
        }

        env.lifetime.request_destruction();
        self.state = ContainerState::Despawned;
        info!(container = %self.container, "container despawned");
        RemovalOutcome::Despawned
    }

    pub fn status(&self) -> DispenserStatus {
        DispenserStatus {
            container: self.container,
            state: self.state,
            budget: self.budget,
            spawn_in_flight: self.guard.is_set(),
            pool_size: self.pool.len(),
            restocks_issued: self.restocks_issued,
        }
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn budget(&self) -> UsageBudget {
        self.budget
    }

    pub fn spawn_in_flight(&self) -> bool {
        self.guard.is_set()
    }

    pub fn pool(&self) -> &EligiblePool {
        &self.pool
    }

    pub fn settings(&self) -> &DispenserSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::{CatalogOracle, InstanceId, ItemCategory, ItemDescriptor, ItemId};
    use crate::env::{ContainerLifetime, ItemSpawner, PcgRng};

    struct TestCatalog {
        items: HashMap<ItemId, ItemDescriptor>,
    }

    impl TestCatalog {
        fn with(ids: &[&str]) -> Self {
            let items = ids
                .iter()
                .map(|id| (id.to_string(), ItemDescriptor::new(*id, ItemCategory::Weapon)))
                .collect();
            Self { items }
        }
    }

    impl CatalogOracle for TestCatalog {
        fn identifiers(&self) -> Vec<ItemId> {
            self.items.keys().cloned().collect()
        }

        fn descriptor(&self, identifier: &str) -> Option<ItemDescriptor> {
            self.items.get(identifier).cloned()
        }
    }

    #[derive(Default)]
    struct RecordingSpawner {
        requests: Mutex<Vec<SpawnRequest>>,
    }

    impl RecordingSpawner {
        fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last(&self) -> SpawnRequest {
            self.requests.lock().unwrap().last().cloned().expect("no spawn requested")
        }
    }

    impl ItemSpawner for RecordingSpawner {
        fn instantiate(&self, request: SpawnRequest) {
            self.requests.lock().unwrap().push(request);
        }
    }

    #[derive(Default)]
    struct TestHolder {
        occupant: Option<ItemInstance>,
        locked: bool,
        seats: usize,
    }

    impl AttachmentPoint for TestHolder {
        fn has_free_slot(&self) -> bool {
            !self.locked && self.occupant.is_none()
        }

        fn seat(&mut self, instance: ItemInstance) {
            self.seats += 1;
            self.occupant = Some(instance);
        }

        fn set_locked(&mut self, locked: bool) {
            self.locked = locked;
        }

        fn is_locked(&self) -> bool {
            self.locked
        }
    }

    #[derive(Default)]
    struct TestLifetime {
        destroyed: bool,
    }

    impl ContainerLifetime for TestLifetime {
        fn request_destruction(&mut self) {
            self.destroyed = true;
        }
    }

    struct Harness {
        catalog: TestCatalog,
        spawner: RecordingSpawner,
        holder: TestHolder,
        lifetime: TestLifetime,
        rng: PcgRng,
    }

    impl Harness {
        fn new(catalog: TestCatalog) -> Self {
            Self {
                catalog,
                spawner: RecordingSpawner::default(),
                holder: TestHolder::default(),
                lifetime: TestLifetime::default(),
                rng: PcgRng,
            }
        }

        fn env(&mut self) -> DispenserEnv<'_> {
            DispenserEnv::new(
                &self.catalog,
                &self.spawner,
                &mut self.holder,
                &mut self.lifetime,
                &self.rng,
            )
        }

        fn finish_spawn(&mut self, dispenser: &mut Dispenser) -> SeatOutcome {
            let request = self.spawner.last();
            let instance = ItemInstance::new(InstanceId(request.ticket), request.identifier());
            dispenser.complete_spawn(instance, &mut self.holder)
        }

        fn remove(&mut self, dispenser: &mut Dispenser) -> RemovalOutcome {
            let removed = self
                .holder
                .occupant
                .take()
                .unwrap_or_else(|| ItemInstance::new(InstanceId(u64::MAX), "unknown"));
            dispenser.on_occupant_removed(&removed, &mut self.env())
        }

        /// Removes the occupant and lets the resulting spawn complete.
        fn cycle(&mut self, dispenser: &mut Dispenser) -> RemovalOutcome {
            let outcome = self.remove(dispenser);
            if dispenser.spawn_in_flight() {
                self.finish_spawn(dispenser);
            }
            outcome
        }
    }

    fn dispenser(pool: &[&str], capacity: i64, despawn: bool) -> Dispenser {
        let pool = EligiblePool::from(pool.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        Dispenser::new(
            ContainerId(1),
            pool,
            DispenserSettings::new(capacity, despawn),
            7,
        )
        .unwrap()
    }

    fn started(pool: &[&str], capacity: i64, despawn: bool) -> (Dispenser, Harness) {
        let mut harness = Harness::new(TestCatalog::with(pool));
        let mut dispenser = dispenser(pool, capacity, despawn);
        let outcome = dispenser.initialize(&harness.env()).unwrap();
        assert!(outcome.is_requested());
        harness.finish_spawn(&mut dispenser);
        (dispenser, harness)
    }

    #[test]
    fn empty_pool_is_rejected() {
        let result = Dispenser::new(
            ContainerId(3),
            EligiblePool::default(),
            DispenserSettings::unlimited(),
            0,
        );
        assert_eq!(
            result.err(),
            Some(DispenserError::EmptyPool {
                container: ContainerId(3)
            })
        );
    }

    #[test]
    fn initialize_stocks_once_and_cannot_repeat() {
        let mut harness = Harness::new(TestCatalog::with(&["sword_a"]));
        let mut dispenser = dispenser(&["sword_a"], 0, false);

        dispenser.initialize(&harness.env()).unwrap();
        assert!(dispenser.spawn_in_flight());
        assert_eq!(harness.spawner.count(), 1);

        let seat = harness.finish_spawn(&mut dispenser);
        assert!(matches!(seat, SeatOutcome::Seated { .. }));
        assert!(!dispenser.spawn_in_flight());
        assert_eq!(harness.holder.seats, 1);

        assert_eq!(
            dispenser.initialize(&harness.env()),
            Err(DispenserError::AlreadyInitialized {
                container: ContainerId(1)
            })
        );
    }

    #[test]
    fn spawn_while_pending_is_a_no_op() {
        let mut harness = Harness::new(TestCatalog::with(&["sword_a"]));
        let mut dispenser = dispenser(&["sword_a"], 5, false);
        dispenser.initialize(&harness.env()).unwrap();

        let before = dispenser.status();
        let outcome = dispenser.spawn_and_seat("sword_a", &harness.env());

        assert_eq!(outcome, RestockOutcome::SpawnPending);
        assert_eq!(dispenser.status(), before);
        assert_eq!(harness.spawner.count(), 1);
    }

    #[test]
    fn removal_while_pending_is_dropped() {
        let (mut dispenser, mut harness) = started(&["sword_a"], 5, false);
        harness.remove(&mut dispenser);
        assert!(dispenser.spawn_in_flight());
        let budget = dispenser.budget();

        let outcome = harness.remove(&mut dispenser);

        assert_eq!(outcome, RemovalOutcome::Ignored(IgnoreReason::SpawnPending));
        assert_eq!(dispenser.budget(), budget);
        assert_eq!(harness.spawner.count(), 2);
    }

    #[test]
    fn capacity_three_locks_on_third_removal() {
        let (mut dispenser, mut harness) = started(&["sword_a", "axe_b"], 3, false);
        assert_eq!(dispenser.budget(), UsageBudget::Remaining(2));

        harness.cycle(&mut dispenser);
        assert_eq!(dispenser.budget(), UsageBudget::Remaining(1));
        harness.cycle(&mut dispenser);
        assert_eq!(dispenser.budget(), UsageBudget::Remaining(0));
        assert_eq!(dispenser.state(), ContainerState::Active);

        let outcome = harness.remove(&mut dispenser);
        assert_eq!(outcome, RemovalOutcome::Locked);
        assert_eq!(dispenser.state(), ContainerState::Locked);
        assert!(harness.holder.locked);
        assert!(!harness.lifetime.destroyed);
        assert_eq!(harness.spawner.count(), 3);
    }

    #[test]
    fn capacity_one_locks_on_first_removal_without_restocking() {
        let (mut dispenser, mut harness) = started(&["sword_a"], 1, false);
        assert_eq!(dispenser.budget(), UsageBudget::Remaining(0));

        assert_eq!(harness.remove(&mut dispenser), RemovalOutcome::Locked);
        assert_eq!(harness.spawner.count(), 1);
    }

    #[test]
    fn capacity_one_with_despawn_destroys_container() {
        let (mut dispenser, mut harness) = started(&["sword_a"], 1, true);

        assert_eq!(harness.remove(&mut dispenser), RemovalOutcome::Despawned);
        assert_eq!(dispenser.state(), ContainerState::Despawned);
        assert!(harness.holder.locked);
        assert!(harness.lifetime.destroyed);
        assert_eq!(harness.spawner.count(), 1);
    }

    #[test]
    fn events_after_lock_are_ignored() {
        let (mut dispenser, mut harness) = started(&["sword_a"], 1, false);
        harness.remove(&mut dispenser);

        assert_eq!(
            harness.remove(&mut dispenser),
            RemovalOutcome::Ignored(IgnoreReason::Terminal)
        );
        assert_eq!(
            dispenser.request_restock(&harness.env()),
            RestockOutcome::Inactive
        );
    }

    #[test]
    fn unlimited_capacity_never_locks() {
        let (mut dispenser, mut harness) = started(&["sword_a", "axe_b", "mace_c"], 0, true);

        for _ in 0..250 {
            let outcome = harness.cycle(&mut dispenser);
            assert!(matches!(outcome, RemovalOutcome::Restocked { .. }));
        }

        assert_eq!(dispenser.budget(), UsageBudget::Infinite);
        assert_eq!(dispenser.state(), ContainerState::Active);
        assert_eq!(harness.holder.seats, 251);
    }

    #[test]
    fn single_item_pool_always_restocks_the_same_item() {
        let (mut dispenser, mut harness) = started(&["sword_a"], 0, false);

        for _ in 0..20 {
            harness.cycle(&mut dispenser);
            assert_eq!(harness.spawner.last().identifier(), "sword_a");
            assert_eq!(harness.holder.occupant.as_ref().unwrap().item, "sword_a");
        }
    }

    #[test]
    fn lookup_miss_leaves_guard_clear_and_seats_nothing() {
        let mut harness = Harness::new(TestCatalog::with(&[]));
        let mut dispenser = dispenser(&["ghost_item"], 0, false);

        let outcome = dispenser.initialize(&harness.env()).unwrap();

        assert_eq!(
            outcome,
            RestockOutcome::LookupMiss {
                identifier: "ghost_item".into()
            }
        );
        assert!(!dispenser.spawn_in_flight());
        assert_eq!(harness.spawner.count(), 0);
        assert_eq!(harness.holder.seats, 0);
    }

    #[test]
    fn lookup_miss_still_consumes_a_grant() {
        let mut harness = Harness::new(TestCatalog::with(&[]));
        let mut dispenser = dispenser(&["ghost_item"], 3, false);
        dispenser.initialize(&harness.env()).unwrap();

        let outcome = harness.remove(&mut dispenser);

        assert!(matches!(
            outcome,
            RemovalOutcome::Restocked {
                restock: RestockOutcome::LookupMiss { .. },
                budget: UsageBudget::Remaining(1),
            }
        ));
    }

    #[test]
    fn occupied_slot_discards_completed_spawn() {
        let mut harness = Harness::new(TestCatalog::with(&["sword_a"]));
        let mut dispenser = dispenser(&["sword_a"], 0, false);
        dispenser.initialize(&harness.env()).unwrap();
        harness.holder.occupant = Some(ItemInstance::new(InstanceId(900), "stray"));

        let outcome = harness.finish_spawn(&mut dispenser);

        assert!(matches!(outcome, SeatOutcome::Discarded { .. }));
        assert!(!dispenser.spawn_in_flight());
        assert_eq!(harness.holder.occupant.as_ref().unwrap().item, "stray");
    }

    #[test]
    fn same_seed_replays_the_same_picks() {
        let pool = ["a", "b", "c", "d", "e"];
        let picks = || {
            let (mut dispenser, mut harness) = started(&pool, 0, false);
            (0..10)
                .map(|_| {
                    harness.cycle(&mut dispenser);
                    harness.spawner.last().identifier().to_owned()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(), picks());
    }
}
