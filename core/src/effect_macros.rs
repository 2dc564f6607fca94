//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when a reducer hands the runtime a
//! fire-and-forget async block or a latest-wins routine.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use admin_console_core::async_effect;
///
/// async_effect! {
///     storage.set_json("selectedModule", &module);
///     None
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create a latest-wins effect that always ends in exactly one action
///
/// Expands to [`Effect::terminal`](crate::effect::Effect::terminal) wrapped
/// in [`Effect::cancellable`](crate::effect::Effect::cancellable).
///
/// # Example
///
/// ```rust,ignore
/// use admin_console_core::latest;
///
/// latest! {
///     id: LOGIN,
///     routine: login(api, credentials),
///     on_panic: |error| AuthAction::LoginFailure { error }
/// }
/// ```
#[macro_export]
macro_rules! latest {
    (
        id: $id:expr,
        routine: $routine:expr,
        on_panic: |$panic_param:ident| $panic_body:expr
    ) => {
        $crate::effect::Effect::terminal($routine, move |$panic_param| $panic_body)
            .cancellable($id)
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectId};

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
        Failed { error: String },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_latest_macro_builds_cancellable_future() {
        const FETCH: EffectId = EffectId::new("dashboard/fetchModules");

        let effect = latest! {
            id: FETCH,
            routine: async { TestAction::AsyncResult { value: 1 } },
            on_panic: |error| TestAction::Failed { error }
        };

        assert_eq!(effect.cancellation_id(), Some(FETCH));
        assert!(matches!(
            effect,
            Effect::Cancellable { effect, .. } if matches!(*effect, Effect::Future(_))
        ));
    }
}
