//! Dashboard actions.

use admin_console_api::types::{
    AdminProfilePayload, AdminProfileResponse, CoordinatorSaved, CoordinatorUpdate, ModuleCatalog,
};

/// Dashboard actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Module list
    // ═══════════════════════════════════════════════════════════════════════
    /// Load the module catalog
    FetchModulesRequest,

    /// Catalog loaded
    FetchModulesSuccess(ModuleCatalog),

    /// Catalog could not be loaded
    FetchModulesFailure {
        /// Error message
        error: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Active module
    // ═══════════════════════════════════════════════════════════════════════
    /// Ask the server for the active module
    FetchCurrentModuleRequest,

    /// Active module reported
    FetchCurrentModuleSuccess(Option<String>),

    /// Active module could not be read
    FetchCurrentModuleFailure {
        /// Error message
        error: String,
    },

    /// Switch the active module on the server
    UpdateCurrentModuleRequest {
        /// Module to activate
        module_name: String,
    },

    /// Switch confirmed; carries the module the server now reports
    UpdateCurrentModuleSuccess(Option<String>),

    /// Switch rejected
    UpdateCurrentModuleFailure {
        /// Error message
        error: String,
    },

    /// Dismiss the switch outcome
    ResetUpdateCurrentModule,

    /// Pick a module locally and remember it in the `selectedModule` cookie
    SelectModule {
        /// Module to select
        module_name: String,
    },

    /// Stop showing a spinner
    ClearLoading,

    // ═══════════════════════════════════════════════════════════════════════
    // Profile
    // ═══════════════════════════════════════════════════════════════════════
    /// Save the admin profile
    UpdateAdminProfileRequest {
        /// Admin id, passed through to the endpoint unchanged
        id: String,
        /// New profile fields
        profile: AdminProfilePayload,
    },

    /// Profile saved
    UpdateAdminProfileSuccess(AdminProfileResponse),

    /// Profile rejected
    UpdateAdminProfileFailure {
        /// Error message
        error: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Coordinator access
    // ═══════════════════════════════════════════════════════════════════════
    /// Save coordinator and producer toggles
    UpdateCoordinatorRequest(CoordinatorUpdate),

    /// Toggles saved
    UpdateCoordinatorSuccess {
        /// Flags as stored by the server
        saved: CoordinatorSaved,
        /// Server message
        message: String,
    },

    /// Toggles rejected
    UpdateCoordinatorFailure {
        /// Error message
        error: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Single vendor
    // ═══════════════════════════════════════════════════════════════════════
    /// Save the single-vendor flag
    UpdateSingleVendorRequest {
        /// Restrict the active module to one producer
        use_producer: bool,
    },

    /// Flag saved
    UpdateSingleVendorSuccess(bool),

    /// Flag rejected
    UpdateSingleVendorFailure {
        /// Error message
        error: String,
    },

    /// Read the single-vendor flag
    FetchSingleVendorRequest,

    /// Flag read
    FetchSingleVendorSuccess(bool),

    /// Flag could not be read
    FetchSingleVendorFailure {
        /// Error message
        error: String,
    },
}
