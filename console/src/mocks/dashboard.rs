//! Mock dashboard endpoints.

use super::{CallLog, Script};
use admin_console_api::types::{
    AdminProfilePayload, AdminProfileResponse, ApiResponse, CoordinatorSaved, CoordinatorUpdate,
    CurrentModule, ModulesResponse, SingleVendor,
};
use admin_console_api::{ApiError, DashboardApi};
use std::time::Duration;

/// A call that reached [`MockDashboardApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCall {
    /// `fetch_modules`
    FetchModules,
    /// `fetch_current_module`
    FetchCurrentModule,
    /// `update_current_module` with the module name
    UpdateCurrentModule(String),
    /// `update_admin_profile`
    UpdateAdminProfile {
        /// Admin id
        id: String,
        /// Submitted fields
        profile: AdminProfilePayload,
    },
    /// `update_coordinator`
    UpdateCoordinator(CoordinatorUpdate),
    /// `fetch_single_vendor`
    FetchSingleVendor,
    /// `update_single_vendor` with the flag
    UpdateSingleVendor(bool),
}

/// Scripted [`DashboardApi`].
///
/// The current-module endpoints share one queue, as do the single-vendor
/// endpoints.
#[derive(Debug, Clone, Default)]
pub struct MockDashboardApi {
    modules: Script<ApiResponse<ModulesResponse>>,
    current_module: Script<ApiResponse<CurrentModule>>,
    profile: Script<AdminProfileResponse>,
    coordinator: Script<ApiResponse<CoordinatorSaved>>,
    single_vendor: Script<ApiResponse<SingleVendor>>,
    calls: CallLog<DashboardCall>,
}

impl MockDashboardApi {
    /// Create a mock with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a module catalog answer
    pub fn respond_modules(&self, result: Result<ApiResponse<ModulesResponse>, ApiError>) {
        self.modules.push(Duration::ZERO, result);
    }

    /// Queue a module catalog answer that arrives after `delay`
    pub fn respond_modules_after(
        &self,
        delay: Duration,
        result: Result<ApiResponse<ModulesResponse>, ApiError>,
    ) {
        self.modules.push(delay, result);
    }

    /// Queue an answer for either current-module endpoint
    pub fn respond_current_module(&self, result: Result<ApiResponse<CurrentModule>, ApiError>) {
        self.current_module.push(Duration::ZERO, result);
    }

    /// Queue a profile answer
    pub fn respond_profile(&self, result: Result<AdminProfileResponse, ApiError>) {
        self.profile.push(Duration::ZERO, result);
    }

    /// Queue a coordinator save answer
    pub fn respond_coordinator(&self, result: Result<ApiResponse<CoordinatorSaved>, ApiError>) {
        self.coordinator.push(Duration::ZERO, result);
    }

    /// Queue an answer for either single-vendor endpoint
    pub fn respond_single_vendor(&self, result: Result<ApiResponse<SingleVendor>, ApiError>) {
        self.single_vendor.push(Duration::ZERO, result);
    }

    /// Calls received so far
    #[must_use]
    pub fn calls(&self) -> Vec<DashboardCall> {
        self.calls.snapshot()
    }
}

impl DashboardApi for MockDashboardApi {
    async fn fetch_modules(&self) -> Result<ApiResponse<ModulesResponse>, ApiError> {
        self.calls.record(DashboardCall::FetchModules);
        self.modules.next("fetch_modules").await
    }

    async fn fetch_current_module(&self) -> Result<ApiResponse<CurrentModule>, ApiError> {
        self.calls.record(DashboardCall::FetchCurrentModule);
        self.current_module.next("fetch_current_module").await
    }

    async fn update_current_module(
        &self,
        module_name: &str,
    ) -> Result<ApiResponse<CurrentModule>, ApiError> {
        self.calls
            .record(DashboardCall::UpdateCurrentModule(module_name.to_string()));
        self.current_module.next("update_current_module").await
    }

    async fn update_admin_profile(
        &self,
        id: &str,
        profile: &AdminProfilePayload,
    ) -> Result<AdminProfileResponse, ApiError> {
        self.calls.record(DashboardCall::UpdateAdminProfile {
            id: id.to_string(),
            profile: profile.clone(),
        });
        self.profile.next("update_admin_profile").await
    }

    async fn update_coordinator(
        &self,
        update: &CoordinatorUpdate,
    ) -> Result<ApiResponse<CoordinatorSaved>, ApiError> {
        self.calls
            .record(DashboardCall::UpdateCoordinator(update.clone()));
        self.coordinator.next("update_coordinator").await
    }

    async fn fetch_single_vendor(&self) -> Result<ApiResponse<SingleVendor>, ApiError> {
        self.calls.record(DashboardCall::FetchSingleVendor);
        self.single_vendor.next("fetch_single_vendor").await
    }

    async fn update_single_vendor(
        &self,
        use_producer: bool,
    ) -> Result<ApiResponse<SingleVendor>, ApiError> {
        self.calls
            .record(DashboardCall::UpdateSingleVendor(use_producer));
        self.single_vendor.next("update_single_vendor").await
    }
}
