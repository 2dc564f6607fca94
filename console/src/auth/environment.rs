//! Authentication environment.
//!
//! This module defines the environment type for dependency injection
//! in the auth reducer.

use crate::navigation::Navigator;
use admin_console_api::{AuthApi, CredentialStorage};
use std::sync::Arc;

/// Authentication environment.
///
/// Contains all external dependencies needed by auth effects.
///
/// # Type Parameters
///
/// - `A`: Auth endpoints
/// - `N`: Navigator
#[derive(Clone)]
pub struct AuthEnvironment<A, N>
where
    A: AuthApi + Clone,
    N: Navigator + Clone,
{
    /// Auth endpoints.
    pub api: A,

    /// Session cookies (`token`, `user`).
    pub storage: Arc<dyn CredentialStorage>,

    /// Route changes after verification and logout.
    pub navigator: N,
}

impl<A, N> AuthEnvironment<A, N>
where
    A: AuthApi + Clone,
    N: Navigator + Clone,
{
    /// Create a new auth environment.
    #[must_use]
    pub fn new(api: A, storage: Arc<dyn CredentialStorage>, navigator: N) -> Self {
        Self {
            api,
            storage,
            navigator,
        }
    }
}
