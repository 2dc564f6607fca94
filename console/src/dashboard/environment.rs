//! Dashboard environment.

use admin_console_api::{CredentialStorage, DashboardApi};
use std::sync::Arc;

/// Dashboard environment.
///
/// # Type Parameters
///
/// - `D`: Dashboard endpoints
#[derive(Clone)]
pub struct DashboardEnvironment<D>
where
    D: DashboardApi + Clone,
{
    /// Dashboard endpoints.
    pub api: D,

    /// Cookie jar holding the `selectedModule` hint.
    pub storage: Arc<dyn CredentialStorage>,
}

impl<D> DashboardEnvironment<D>
where
    D: DashboardApi + Clone,
{
    /// Create a new dashboard environment.
    #[must_use]
    pub fn new(api: D, storage: Arc<dyn CredentialStorage>) -> Self {
        Self { api, storage }
    }
}
