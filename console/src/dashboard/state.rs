//! Dashboard state.

use admin_console_api::storage::keys;
use admin_console_api::types::{AdminProfileResponse, ModuleFlags};
use admin_console_api::{CredentialStorage, CredentialStorageExt};
use serde::{Deserialize, Serialize};

/// Dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Modules in display order.
    pub modules: Vec<String>,

    /// Active module; always one of `modules` once the list is known.
    pub current_module: Option<String>,

    /// Coordinator access per module.
    pub use_coordinator: ModuleFlags,

    /// Producer access per module.
    pub use_producer: ModuleFlags,

    /// Coordinator flags echoed by the last save.
    pub coordinator: ModuleFlags,

    /// Producer flags echoed by the last save.
    pub producers: ModuleFlags,

    /// URL of the file delivered with the last save.
    pub asset_url: Option<String>,

    /// Single-vendor flag of the active module, once read or saved.
    pub single_vendor: Option<bool>,

    /// A dashboard request is in flight.
    pub loading: bool,

    /// Last dashboard error.
    pub error: Option<String>,

    /// The last module switch succeeded.
    pub success: bool,

    /// Message of the last successful save.
    pub success_message: Option<String>,

    /// Envelope of the last profile update.
    pub profile: Option<AdminProfileResponse>,
}

impl DashboardState {
    /// Initial state seeded with the `selectedModule` cookie
    ///
    /// The hint is provisional: it is dropped by the first module list that
    /// does not contain it.
    #[must_use]
    pub fn hydrate<S: CredentialStorage + ?Sized>(storage: &S) -> Self {
        Self {
            current_module: storage.get_json(keys::SELECTED_MODULE),
            ..Self::default()
        }
    }

    /// Whether `module` may become the active module
    ///
    /// Any name is accepted until the module list is known.
    #[must_use]
    pub fn is_known_module(&self, module: &str) -> bool {
        self.modules.is_empty() || self.modules.iter().any(|m| m == module)
    }

    /// Coordinator and producer flags of the active module
    #[must_use]
    pub fn current_flags(&self) -> Option<(bool, bool)> {
        let module = self.current_module.as_deref()?;
        Some((
            self.use_coordinator.get(module).copied().unwrap_or(false),
            self.use_producer.get(module).copied().unwrap_or(false),
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use admin_console_api::MemoryCookieJar;

    #[test]
    fn hydrate_reads_selected_module_hint() {
        let jar = MemoryCookieJar::new();
        jar.set_json(keys::SELECTED_MODULE, "E-learning").unwrap();

        let state = DashboardState::hydrate(&jar);

        assert_eq!(state.current_module.as_deref(), Some("E-learning"));
        assert!(state.modules.is_empty());
    }

    #[test]
    fn undecodable_hint_is_ignored() {
        let jar = MemoryCookieJar::new();
        jar.set(keys::SELECTED_MODULE, "E-learning").unwrap();

        assert_eq!(DashboardState::hydrate(&jar).current_module, None);
    }

    #[test]
    fn known_module_check() {
        let mut state = DashboardState::default();
        assert!(state.is_known_module("anything"));

        state.modules = vec!["E-learning".to_string(), "Retail".to_string()];
        assert!(state.is_known_module("Retail"));
        assert!(!state.is_known_module("Health"));
    }

    #[test]
    fn current_flags_default_to_off() {
        let mut state = DashboardState {
            current_module: Some("Retail".to_string()),
            ..DashboardState::default()
        };
        state.use_coordinator.insert("Retail".to_string(), true);

        assert_eq!(state.current_flags(), Some((true, false)));
        assert_eq!(DashboardState::default().current_flags(), None);
    }
}
