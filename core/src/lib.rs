//! # Admin Console Core
//!
//! Core traits and types for the admin console state layer.
//!
//! This crate provides the abstractions every feature area (auth, dashboard)
//! is built from:
//!
//! - **State**: Plain, serializable data for a feature
//! - **Action**: All inputs to a reducer (intents, server results, housekeeping)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O in reducers)
//! - Dependency Injection via Environment
//! - Latest-wins coordination through cancellable effects
//!
//! ## Example
//!
//! ```ignore
//! use admin_console_core::*;
//!
//! impl Reducer for AuthReducer {
//!     type State = AuthState;
//!     type Action = AuthAction;
//!     type Environment = AuthEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut AuthState,
//!         action: AuthAction,
//!         env: &AuthEnvironment,
//!     ) -> SmallVec<[Effect<AuthAction>; 4]> {
//!         match action {
//!             AuthAction::LoginRequest { .. } => {
//!                 state.loading = true;
//!                 smallvec![login_effect(env).cancellable(LOGIN)]
//!             }
//!             _ => SmallVec::new(),
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Declarative macros for building effects
pub mod effect_macros;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The feature state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// A reducer must never perform I/O, read the wall clock or panic.
    /// Anything that touches the outside world is returned as an [`Effect`]
    /// and executed by the runtime.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and can be marked cancellable.
pub mod effect {
    use futures::FutureExt;
    use std::any::Any;
    use std::future::Future;
    use std::panic::AssertUnwindSafe;
    use std::pin::Pin;

    /// Identifier for a family of cancellable effects
    ///
    /// Effects claimed under the same id follow latest-wins: starting a new
    /// one supersedes whatever is still in flight for that id. By convention
    /// the id is the name of the action kind that started the effect,
    /// e.g. `"auth/login"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create an effect id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The id as a string slice
        #[must_use]
        pub const fn as_str(self) -> &'static str {
            self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Effect subject to latest-wins cancellation
        ///
        /// When the runtime starts this effect it supersedes every effect
        /// still in flight under the same `id`. Actions produced by a
        /// superseded effect are discarded.
        Cancellable {
            /// Family this effect belongs to
            id: EffectId,
            /// The wrapped effect
            effect: Box<Effect<Action>>,
        },
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Mark this effect as latest-wins under `id`
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// The cancellation id of this effect, if it has one
        #[must_use]
        pub const fn cancellation_id(&self) -> Option<EffectId> {
            match self {
                Effect::Cancellable { id, .. } => Some(*id),
                _ => None,
            }
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Build an effect that always produces exactly one terminal action
        ///
        /// `routine` resolves to the success or failure action. If it panics,
        /// the panic is contained and `on_panic` builds the failure action
        /// from a best-effort message, so the effect still terminates with
        /// one action.
        pub fn terminal<F, P>(routine: F, on_panic: P) -> Effect<Action>
        where
            F: Future<Output = Action> + Send + 'static,
            P: FnOnce(String) -> Action + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                match AssertUnwindSafe(routine).catch_unwind().await {
                    Ok(action) => Some(action),
                    Err(payload) => Some(on_panic(panic_message(payload.as_ref()))),
                }
            }))
        }
    }

    /// Fallback message when a panic payload carries no text
    pub const UNEXPECTED_FAILURE: &str = "Something went wrong";

    fn panic_message(payload: &(dyn Any + Send)) -> String {
        payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| UNEXPECTED_FAILURE.to_string())
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Reducers never read the clock; storage and effect code do
    /// (cookie expiry, for instance).
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::effect::{Effect, EffectId};

    #[derive(Debug, Clone, PartialEq)]
    enum Outcome {
        Done(u32),
        Failed(String),
    }

    async fn run(effect: Effect<Outcome>) -> Option<Outcome> {
        match effect {
            Effect::Future(fut) => fut.await,
            other => panic!("expected a future effect, got {other:?}"),
        }
    }

    #[test]
    fn cancellable_wraps_and_reports_id() {
        const LOGIN: EffectId = EffectId::new("auth/login");

        let effect = Effect::<Outcome>::None.cancellable(LOGIN);

        assert_eq!(effect.cancellation_id(), Some(LOGIN));
        assert_eq!(LOGIN.to_string(), "auth/login");
        assert!(Effect::<Outcome>::None.cancellation_id().is_none());
    }

    #[tokio::test]
    async fn terminal_passes_through_the_routine_result() {
        let effect = Effect::terminal(async { Outcome::Done(7) }, Outcome::Failed);

        assert_eq!(run(effect).await, Some(Outcome::Done(7)));
    }

    #[tokio::test]
    async fn terminal_turns_a_panic_into_the_failure_action() {
        async fn explode() -> Outcome {
            panic!("socket exploded")
        }

        let effect = Effect::terminal(explode(), Outcome::Failed);

        assert_eq!(
            run(effect).await,
            Some(Outcome::Failed("socket exploded".to_string()))
        );
    }

    #[tokio::test]
    async fn terminal_uses_fallback_for_opaque_panics() {
        async fn explode_opaquely() -> Outcome {
            std::panic::panic_any(42_u8)
        }

        let effect = Effect::terminal(explode_opaquely(), Outcome::Failed);

        assert_eq!(
            run(effect).await,
            Some(Outcome::Failed(super::effect::UNEXPECTED_FAILURE.to_string()))
        );
    }
}
