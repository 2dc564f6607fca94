//! Dashboard effect routines.
//!
//! Each request kind is latest-wins under its own [`EffectId`]. A
//! `success: false` envelope is treated like a server rejection.

use super::actions::DashboardAction;
use admin_console_api::storage::keys;
use admin_console_api::types::{AdminProfilePayload, ApiResponse, CoordinatorUpdate};
use admin_console_api::{ApiError, CredentialStorage, CredentialStorageExt, DashboardApi};
use admin_console_core::effect::{Effect, EffectId};
use admin_console_core::{async_effect, latest};
use std::sync::Arc;

/// Module catalog
pub const FETCH_MODULES: EffectId = EffectId::new("dashboard/fetchModules");
/// Active module read
pub const FETCH_CURRENT_MODULE: EffectId = EffectId::new("dashboard/fetchCurrentModule");
/// Active module switch
pub const UPDATE_CURRENT_MODULE: EffectId = EffectId::new("dashboard/updateCurrentModule");
/// Profile save
pub const UPDATE_ADMIN_PROFILE: EffectId = EffectId::new("dashboard/updateAdminProfile");
/// Coordinator save
pub const UPDATE_COORDINATOR: EffectId = EffectId::new("dashboard/updateCoordinator");
/// Single-vendor save
pub const UPDATE_SINGLE_VENDOR: EffectId = EffectId::new("dashboard/updateSingleVendor");
/// Single-vendor read
pub const FETCH_SINGLE_VENDOR: EffectId = EffectId::new("dashboard/fetchSingleVendor");
/// `selectedModule` cookie write
pub const SELECT_MODULE: EffectId = EffectId::new("dashboard/selectModule");

/// Accepted envelope, or the message to report
fn settle<T>(result: Result<ApiResponse<T>, ApiError>, fallback: &str) -> Result<ApiResponse<T>, String> {
    match result {
        Ok(response) if response.success => Ok(response),
        Ok(response) if response.message.is_empty() => Err(fallback.to_string()),
        Ok(response) => Err(response.message),
        Err(error) => Err(error.to_string()),
    }
}

/// Load the module catalog, accepting either response shape
pub fn fetch_modules<D>(api: D) -> Effect<DashboardAction>
where
    D: DashboardApi + 'static,
{
    latest! {
        id: FETCH_MODULES,
        routine: async move {
            let response = settle(api.fetch_modules().await, "Failed to fetch modules");
            match response.map(|r| r.data) {
                Ok(Some(modules)) => DashboardAction::FetchModulesSuccess(modules.into()),
                Ok(None) => DashboardAction::FetchModulesFailure {
                    error: "Module list missing from response".to_string(),
                },
                Err(error) => DashboardAction::FetchModulesFailure { error },
            }
        },
        on_panic: |error| DashboardAction::FetchModulesFailure { error }
    }
}

/// Read the active module
pub fn fetch_current_module<D>(api: D) -> Effect<DashboardAction>
where
    D: DashboardApi + 'static,
{
    latest! {
        id: FETCH_CURRENT_MODULE,
        routine: async move {
            match settle(api.fetch_current_module().await, "Failed to fetch current module") {
                Ok(response) => DashboardAction::FetchCurrentModuleSuccess(
                    response.data.and_then(|data| data.current_module),
                ),
                Err(error) => DashboardAction::FetchCurrentModuleFailure { error },
            }
        },
        on_panic: |error| DashboardAction::FetchCurrentModuleFailure { error }
    }
}

/// Switch the active module; the server's answer decides the new value
pub fn update_current_module<D>(api: D, module_name: String) -> Effect<DashboardAction>
where
    D: DashboardApi + 'static,
{
    latest! {
        id: UPDATE_CURRENT_MODULE,
        routine: async move {
            let result = api.update_current_module(&module_name).await;
            match settle(result, "Failed to update current module") {
                Ok(response) => DashboardAction::UpdateCurrentModuleSuccess(
                    response.data.and_then(|data| data.current_module),
                ),
                Err(error) => DashboardAction::UpdateCurrentModuleFailure { error },
            }
        },
        on_panic: |error| DashboardAction::UpdateCurrentModuleFailure { error }
    }
}

/// Save the admin profile under `id`
pub fn update_admin_profile<D>(api: D, id: String, profile: AdminProfilePayload) -> Effect<DashboardAction>
where
    D: DashboardApi + 'static,
{
    latest! {
        id: UPDATE_ADMIN_PROFILE,
        routine: async move {
            match settle(api.update_admin_profile(&id, &profile).await, "Failed to update profile") {
                Ok(response) => DashboardAction::UpdateAdminProfileSuccess(response),
                Err(error) => DashboardAction::UpdateAdminProfileFailure { error },
            }
        },
        on_panic: |error| DashboardAction::UpdateAdminProfileFailure { error }
    }
}

/// Save coordinator and producer toggles through the configured endpoint
pub fn update_coordinator<D>(api: D, update: CoordinatorUpdate) -> Effect<DashboardAction>
where
    D: DashboardApi + 'static,
{
    latest! {
        id: UPDATE_COORDINATOR,
        routine: async move {
            match settle(api.update_coordinator(&update).await, "Failed to update coordinator") {
                Ok(response) => DashboardAction::UpdateCoordinatorSuccess {
                    saved: response.data.unwrap_or_default(),
                    message: response.message,
                },
                Err(error) => DashboardAction::UpdateCoordinatorFailure { error },
            }
        },
        on_panic: |error| DashboardAction::UpdateCoordinatorFailure { error }
    }
}

/// Save the single-vendor flag; a missing echo keeps the requested value
pub fn update_single_vendor<D>(api: D, use_producer: bool) -> Effect<DashboardAction>
where
    D: DashboardApi + 'static,
{
    latest! {
        id: UPDATE_SINGLE_VENDOR,
        routine: async move {
            let result = api.update_single_vendor(use_producer).await;
            match settle(result, "Failed to update single vendor") {
                Ok(response) => DashboardAction::UpdateSingleVendorSuccess(
                    response.data.map_or(use_producer, |data| data.use_producer),
                ),
                Err(error) => DashboardAction::UpdateSingleVendorFailure { error },
            }
        },
        on_panic: |error| DashboardAction::UpdateSingleVendorFailure { error }
    }
}

/// Read the single-vendor flag
pub fn fetch_single_vendor<D>(api: D) -> Effect<DashboardAction>
where
    D: DashboardApi + 'static,
{
    latest! {
        id: FETCH_SINGLE_VENDOR,
        routine: async move {
            let response = settle(api.fetch_single_vendor().await, "Failed to fetch single vendor");
            match response.map(|r| r.data) {
                Ok(Some(data)) => DashboardAction::FetchSingleVendorSuccess(data.use_producer),
                Ok(None) => DashboardAction::FetchSingleVendorFailure {
                    error: "Single vendor flag missing from response".to_string(),
                },
                Err(error) => DashboardAction::FetchSingleVendorFailure { error },
            }
        },
        on_panic: |error| DashboardAction::FetchSingleVendorFailure { error }
    }
}

/// Remember the selection in the `selectedModule` cookie
///
/// Latest-wins, so a quick run of selections leaves the last one behind.
pub fn remember_module(storage: Arc<dyn CredentialStorage>, module_name: String) -> Effect<DashboardAction> {
    async_effect! {
        if let Err(error) = storage.set_json(keys::SELECTED_MODULE, &module_name) {
            tracing::warn!(module = %module_name, %error, "Failed to remember selected module");
        }
        None
    }
    .cancellable(SELECT_MODULE)
}
