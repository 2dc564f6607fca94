//! # Admin Console Runtime
//!
//! Runtime implementation for the admin console state layer.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns one feature area's state and executes effects
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to the reducer
//! - **Lease Registry**: Latest-wins supersession for cancellable effects
//!
//! ## Example
//!
//! ```ignore
//! use admin_console_runtime::Store;
//!
//! let store = Store::new(AuthState::hydrate(&jar), AuthReducer::default(), env);
//!
//! // Send an action
//! store.send(AuthAction::LoginRequest { email, password }).await?;
//!
//! // Read state
//! let loading = store.state(|s| s.loading).await;
//! ```

use admin_console_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

mod lease;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

use lease::{Lease, LeaseRegistry};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects that action
/// started. An effect counts as complete once the action it produced (if
/// any) has been applied to the state.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(DashboardAction::FetchModulesRequest).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // FetchModulesSuccess or FetchModulesFailure has been applied
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and the tracking context used during execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Returned for actions that were dropped and useful as the initial
    /// value when sending actions in a loop.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing can still be running
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect
/// panics or is aborted by a newer claim.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: an effect with its latest-wins lease resolved
///
/// Built while the state write lock is held, so claiming an id is ordered
/// with the transition that requested it.
struct Plan<A> {
    future: Pin<Box<dyn Future<Output = Option<A>> + Send>>,
    lease: Option<Lease>,
}

impl<A> Plan<A> {
    fn build(effect: Effect<A>, lease: Option<Lease>, registry: &Arc<LeaseRegistry>) -> Option<Self> {
        match effect {
            Effect::None => None,
            Effect::Future(future) => Some(Self { future, lease }),
            Effect::Cancellable { id, effect } => {
                let claimed = registry.claim(id);
                Self::build(*effect, Some(claimed), registry)
            },
        }
    }
}

/// Where an action entered the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Dispatched by a caller (UI, CLI, tests)
    Caller,
    /// Produced by an effect
    Effect,
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration,
        EffectHandle, EffectTracking, Future, Lease, LeaseRegistry, Ordering, Origin, Pin, Plan,
        Reducer, RwLock, StoreError,
    };
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (transition logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and latest-wins supersession)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        leases: Arc<LeaseRegistry>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Action broadcast channel for observing actions produced by effects.
        action_broadcast: broadcast::Sender<A>,
        /// Bumped after every applied transition.
        revision: Arc<watch::Sender<u64>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast buffers 16 actions; use
        /// [`Store::with_broadcast_capacity`] for more.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new Store with custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity);
            let (revision, _) = watch::channel(0);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                leases: Arc::new(LeaseRegistry::default()),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
                revision: Arc::new(revision),
            }
        }

        /// The injected environment
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions, then waits for pending effects to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(50);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Claims latest-wins leases for cancellable effects
        /// 4. Executes returned effects asynchronously
        ///
        /// `send()` returns once the transition is applied and effects have
        /// started, not when they complete. Use the returned
        /// [`EffectHandle`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic will propagate.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            self.send_internal(action, None, Origin::Caller).await
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, then returns
        /// the first effect-produced action matching `predicate` once the
        /// effects started by `action` (and by the actions they produced)
        /// have completed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            R: Clone,
            E: Clone,
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            let mut handle = self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => {
                            handle.wait().await;
                            return Ok(action);
                        },
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Only actions that were actually applied are broadcast; results of
        /// superseded effects never appear here.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Subscribe to state changes
        ///
        /// The receiver observes a revision number that increases after every
        /// applied transition; read the state with [`Store::state`] when it
        /// changes.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<u64> {
            self.revision.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let modules = store.state(|s| s.modules.clone()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        async fn send_internal(
            &self,
            action: A,
            lease: Option<&Lease>,
            origin: Origin,
        ) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            let (handle, tracking) = EffectHandle::new();

            let plans = {
                let mut state = self.state.write().await;

                if let Some(lease) = lease {
                    if !lease.is_current() {
                        tracing::debug!(effect_id = %lease.id(), "Dropping action from superseded effect");
                        metrics::counter!("store.actions.dropped", "id" => lease.id().as_str())
                            .increment(1);
                        return Ok(EffectHandle::completed());
                    }
                }

                metrics::counter!("store.actions.total").increment(1);
                let observed = (origin == Origin::Effect).then(|| action.clone());

                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();
                    self.reducer.reduce(&mut *state, action, &self.environment)
                };
                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                self.revision.send_modify(|revision| *revision += 1);
                if let Some(action) = observed {
                    let _ = self.action_broadcast.send(action);
                }

                effects
                    .into_iter()
                    .filter_map(|effect| Plan::build(effect, None, &self.leases))
                    .collect::<Vec<_>>()
            };

            for plan in plans {
                self.execute(plan, &tracking);
            }

            Ok(handle)
        }

        /// Start a plan on its own task, tracked for completion and shutdown
        fn execute(&self, plan: Plan<A>, tracking: &EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            metrics::counter!("store.effects.executed").increment(1);
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);

            let guard = DecrementGuard(tracking.clone());
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
            let lease = plan.lease.clone();
            let store = self.clone();

            let task = tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                store.run(plan).await;
            });

            if let Some(lease) = lease {
                lease.attach(task.abort_handle());
            }
        }

        /// Drive a plan to completion on the current task
        ///
        /// The produced action is applied under the plan's lease, and the
        /// task stays alive until the effects that action started have
        /// completed too, so an [`EffectHandle`] covers the whole cascade.
        fn run(&self, plan: Plan<A>) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>
        where
            R: Clone,
            E: Clone,
        {
            Box::pin(async move {
                let Plan { future, lease } = plan;
                let Some(action) = future.await else {
                    tracing::trace!("Effect completed with no action");
                    return;
                };

                if let Ok(mut follow_up) = self
                    .send_internal(action, lease.as_ref(), Origin::Effect)
                    .await
                {
                    follow_up.wait().await;
                }
            })
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                leases: Arc::clone(&self.leases),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
                revision: Arc::clone(&self.revision),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)] // Tests are allowed to panic on failures

    use super::*;
    use admin_console_core::effect::EffectId;
    use admin_console_core::{smallvec, SmallVec};
    use std::time::Duration;

    const FETCH: EffectId = EffectId::new("test/fetch");
    const SAVE: EffectId = EffectId::new("test/save");

    #[derive(Debug, Clone, Default)]
    struct TestState {
        value: i32,
        loading: bool,
        fetched: Vec<u32>,
        saved: Vec<u32>,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceChainedEffect,
        Chained,
        ProducePanickingEffect,
        Fetch { tag: u32, latency_ms: u64 },
        Fetched { tag: u32 },
        Save { tag: u32, latency_ms: u64 },
        Saved { tag: u32 },
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    fn after(latency_ms: u64, action: TestAction) -> Effect<TestAction> {
        Effect::Future(Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
            Some(action)
        }))
    }

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async {
                        Some(TestAction::Increment)
                    }))]
                },
                TestAction::ProduceChainedEffect => {
                    smallvec![after(10, TestAction::Chained)]
                },
                TestAction::Chained => {
                    state.value += 10;
                    smallvec![after(30, TestAction::Increment)]
                },
                TestAction::ProducePanickingEffect => {
                    smallvec![Effect::Future(Box::pin(async {
                        panic!("Intentional panic in effect for testing");
                    }))]
                },
                TestAction::Fetch { tag, latency_ms } => {
                    state.loading = true;
                    smallvec![after(latency_ms, TestAction::Fetched { tag }).cancellable(FETCH)]
                },
                TestAction::Fetched { tag } => {
                    state.loading = false;
                    state.fetched.push(tag);
                    SmallVec::new()
                },
                TestAction::Save { tag, latency_ms } => {
                    smallvec![after(latency_ms, TestAction::Saved { tag }).cancellable(SAVE)]
                },
                TestAction::Saved { tag } => {
                    state.saved.push(tag);
                    SmallVec::new()
                },
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState::default(), TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_none() {
        let store = store();

        let _ = store.send(TestAction::NoOp).await;
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn handle_covers_effects_started_by_feedback_actions() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceChainedEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        // Chained (+10) and the Increment it started (+1) have both landed
        assert_eq!(store.state(|s| s.value).await, 11);
        Ok(())
    }

    #[tokio::test]
    async fn send_and_wait_for_returns_after_follow_up_effects() -> Result<(), StoreError> {
        let store = store();

        let matched = store
            .send_and_wait_for(
                TestAction::ProduceChainedEffect,
                |action| matches!(action, TestAction::Chained),
                Duration::from_secs(1),
            )
            .await?;

        assert!(matches!(matched, TestAction::Chained));
        assert_eq!(store.state(|s| s.value).await, 11);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_sends() {
        let store = store();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TestAction::Increment).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        assert_eq!(store.state(|s| s.value).await, 10);
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() {
        let store1 = store();
        let store2 = store1.clone();

        let _ = store1.send(TestAction::Increment).await;
        assert_eq!(store2.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        let _ = store.send(TestAction::Increment).await?;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn latest_request_wins_when_older_response_arrives_last() -> Result<(), StoreError> {
        let store = store();

        let mut slow = store.send(TestAction::Fetch { tag: 1, latency_ms: 150 }).await?;
        let mut fast = store.send(TestAction::Fetch { tag: 2, latency_ms: 10 }).await?;

        fast.wait_with_timeout(Duration::from_secs(1)).await?;
        slow.wait_with_timeout(Duration::from_secs(1)).await?;
        tokio::time::sleep(Duration::from_millis(200)).await;

        let (fetched, loading) = store.state(|s| (s.fetched.clone(), s.loading)).await;
        assert_eq!(fetched, vec![2]);
        assert!(!loading);
        Ok(())
    }

    #[tokio::test]
    async fn superseded_result_is_dropped_even_when_it_resolves_first() -> Result<(), StoreError> {
        let store = store();

        let _ = store.send(TestAction::Fetch { tag: 1, latency_ms: 30 }).await?;
        let mut newest = store.send(TestAction::Fetch { tag: 2, latency_ms: 80 }).await?;

        newest.wait_with_timeout(Duration::from_secs(1)).await?;

        assert_eq!(store.state(|s| s.fetched.clone()).await, vec![2]);
        Ok(())
    }

    #[tokio::test]
    async fn supersession_is_scoped_to_the_effect_id() -> Result<(), StoreError> {
        let store = store();

        let mut save = store.send(TestAction::Save { tag: 7, latency_ms: 60 }).await?;
        let mut fetch = store.send(TestAction::Fetch { tag: 1, latency_ms: 10 }).await?;

        save.wait_with_timeout(Duration::from_secs(1)).await?;
        fetch.wait_with_timeout(Duration::from_secs(1)).await?;

        let (fetched, saved) = store.state(|s| (s.fetched.clone(), s.saved.clone())).await;
        assert_eq!(fetched, vec![1]);
        assert_eq!(saved, vec![7]);
        Ok(())
    }

    #[tokio::test]
    async fn subscribers_observe_every_transition() -> Result<(), StoreError> {
        let store = store();
        let mut revisions = store.subscribe();
        let start = *revisions.borrow_and_update();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        assert!(revisions.has_changed().unwrap_or(false));
        // ProduceEffect itself plus the Increment it fed back
        assert_eq!(*revisions.borrow_and_update(), start + 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = store();

        store.shutdown(Duration::from_secs(1)).await?;

        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        Ok(())
    }
}
