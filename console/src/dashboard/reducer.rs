//! Dashboard reducer.

use super::actions::DashboardAction;
use super::effects;
use super::environment::DashboardEnvironment;
use super::state::DashboardState;
use admin_console_api::DashboardApi;
use admin_console_core::effect::Effect;
use admin_console_core::reducer::Reducer;
use admin_console_core::{smallvec, SmallVec};
use std::sync::Arc;

/// Dashboard reducer.
#[derive(Debug, Clone)]
pub struct DashboardReducer<D> {
    _phantom: std::marker::PhantomData<D>,
}

impl<D> DashboardReducer<D> {
    /// Create a new dashboard reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<D> Default for DashboardReducer<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Start a request: spinner on, previous error gone
fn begin(state: &mut DashboardState) {
    state.loading = true;
    state.error = None;
}

/// End a request with an error
fn fail(state: &mut DashboardState, error: String) {
    state.loading = false;
    state.error = Some(error);
}

/// Apply a module the server reports as active
///
/// A name outside the known module list is dropped.
fn accept_current_module(state: &mut DashboardState, module: Option<String>) {
    state.current_module = module.filter(|m| state.is_known_module(m));
}

impl<D> Reducer for DashboardReducer<D>
where
    D: DashboardApi + Clone + 'static,
{
    type State = DashboardState;
    type Action = DashboardAction;
    type Environment = DashboardEnvironment<D>;

    #[allow(clippy::too_many_lines)] // One arm per action keeps the transition table readable
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Module list
            // ═══════════════════════════════════════════════════════════════
            DashboardAction::FetchModulesRequest => {
                begin(state);
                smallvec![effects::fetch_modules(env.api.clone())]
            },

            DashboardAction::FetchModulesSuccess(catalog) => {
                state.loading = false;
                state.modules = catalog.modules;
                state.use_coordinator = catalog.use_coordinator;
                state.use_producer = catalog.use_producer;

                let current = catalog.current_module.or_else(|| state.current_module.take());
                accept_current_module(state, current);
                SmallVec::new()
            },

            DashboardAction::FetchModulesFailure { error }
            | DashboardAction::FetchCurrentModuleFailure { error }
            | DashboardAction::UpdateAdminProfileFailure { error }
            | DashboardAction::UpdateCoordinatorFailure { error }
            | DashboardAction::UpdateSingleVendorFailure { error }
            | DashboardAction::FetchSingleVendorFailure { error } => {
                fail(state, error);
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // Active module
            // ═══════════════════════════════════════════════════════════════
            DashboardAction::FetchCurrentModuleRequest => {
                begin(state);
                smallvec![effects::fetch_current_module(env.api.clone())]
            },

            DashboardAction::FetchCurrentModuleSuccess(module) => {
                state.loading = false;
                accept_current_module(state, module);
                SmallVec::new()
            },

            DashboardAction::UpdateCurrentModuleRequest { module_name } => {
                begin(state);
                state.success = false;
                smallvec![effects::update_current_module(env.api.clone(), module_name)]
            },

            DashboardAction::UpdateCurrentModuleSuccess(module) => {
                state.loading = false;
                state.success = true;
                accept_current_module(state, module);
                SmallVec::new()
            },

            DashboardAction::UpdateCurrentModuleFailure { error } => {
                fail(state, error);
                state.success = false;
                SmallVec::new()
            },

            DashboardAction::ResetUpdateCurrentModule => {
                state.success = false;
                state.error = None;
                SmallVec::new()
            },

            DashboardAction::SelectModule { module_name } => {
                if !state.is_known_module(&module_name) {
                    return SmallVec::new();
                }
                state.current_module = Some(module_name.clone());
                smallvec![effects::remember_module(Arc::clone(&env.storage), module_name)]
            },

            DashboardAction::ClearLoading => {
                state.loading = false;
                state.error = None;
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // Profile
            // ═══════════════════════════════════════════════════════════════
            DashboardAction::UpdateAdminProfileRequest { id, profile } => {
                begin(state);
                state.success_message = None;
                smallvec![effects::update_admin_profile(env.api.clone(), id, profile)]
            },

            DashboardAction::UpdateAdminProfileSuccess(response) => {
                state.loading = false;
                state.success_message = Some(response.message.clone());
                state.profile = Some(response);
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // Coordinator access
            // ═══════════════════════════════════════════════════════════════
            DashboardAction::UpdateCoordinatorRequest(update) => {
                begin(state);
                state.success_message = None;
                smallvec![effects::update_coordinator(env.api.clone(), update)]
            },

            DashboardAction::UpdateCoordinatorSuccess { saved, message } => {
                state.loading = false;
                state.coordinator = saved.coordinator;
                state.producers = saved.producers;
                state.asset_url = saved.asset_url;
                state.success_message = Some(message);
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // Single vendor
            // ═══════════════════════════════════════════════════════════════
            DashboardAction::UpdateSingleVendorRequest { use_producer } => {
                begin(state);
                smallvec![effects::update_single_vendor(env.api.clone(), use_producer)]
            },

            DashboardAction::FetchSingleVendorRequest => {
                begin(state);
                smallvec![effects::fetch_single_vendor(env.api.clone())]
            },

            DashboardAction::UpdateSingleVendorSuccess(use_producer)
            | DashboardAction::FetchSingleVendorSuccess(use_producer) => {
                state.loading = false;
                state.single_vendor = Some(use_producer);
                SmallVec::new()
            },
        }
    }
}
