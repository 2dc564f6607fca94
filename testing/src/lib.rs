//! # Admin Console Testing
//!
//! Testing utilities and helpers for the admin console state layer.
//!
//! This crate provides:
//! - Deterministic clocks
//! - Helpers to resolve effects without a Store and to settle a Store
//! - Property-based testing strategies
//! - A Given-When-Then harness and assertion helpers for reducers
//!
//! ## Example
//!
//! ```ignore
//! use admin_console_testing::{ReducerTest, assertions};
//!
//! #[test]
//! fn login_request_starts_loading() {
//!     ReducerTest::new(AuthReducer::default())
//!         .with_env(test_environment())
//!         .given_state(AuthState::default())
//!         .when_action(AuthAction::LoginRequest { email, password })
//!         .then_state(|s| assert!(s.loading))
//!         .then_effects(|e| assertions::assert_has_cancellable_effect(e, LOGIN))
//!         .run();
//! }
//! ```

use admin_console_core::environment::Clock;
use chrono::{DateTime, Utc};


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use admin_console_testing::mocks::FixedClock;
    /// use admin_console_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to
    ///
    /// Clones share the same time, so a test can hand one to a cookie jar
    /// and advance it from the outside.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Start the clock at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    use admin_console_core::effect::Effect;
    use admin_console_core::reducer::Reducer;
    use admin_console_runtime::{Store, StoreError};
    use std::time::Duration;

    /// Run an effect to completion without a Store and return the action it produces
    ///
    /// Cancellation ids are ignored, which makes this suitable for checking
    /// what a routine does against mock dependencies.
    pub async fn resolve_effect<A: Send + 'static>(mut effect: Effect<A>) -> Option<A> {
        loop {
            match effect {
                Effect::None => return None,
                Effect::Future(future) => return future.await,
                Effect::Cancellable { effect: inner, .. } => effect = *inner,
            }
        }
    }

    /// Send an action and wait until every effect it started has fed back
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from sending, and returns
    /// [`StoreError::Timeout`] if the effects are still running after `timeout`.
    pub async fn settle<S, A, E, R>(
        store: &Store<S, A, E, R>,
        action: A,
        timeout: Duration,
    ) -> Result<(), StoreError>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let mut handle = store.send(action).await?;
        handle.wait_with_timeout(timeout).await
    }

    /// Install a test subscriber that honours `RUST_LOG`
    ///
    /// Safe to call from every test; only the first call installs it.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest
pub mod properties {
    use proptest::prelude::*;

    /// Syntactically valid email addresses
    pub fn email() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9.]{0,11}", "[a-z]{2,10}", "(com|org|io|net)")
            .prop_map(|(user, domain, tld)| format!("{user}@{domain}.{tld}"))
    }

    /// Short free text, possibly empty
    pub fn text() -> impl Strategy<Value = String> {
        "[ -~]{0,24}"
    }

    /// Optional short free text
    pub fn maybe_text() -> impl Strategy<Value = Option<String>> {
        proptest::option::of(text())
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, ManualClock};
