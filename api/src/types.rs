//! Wire types for the super-admin REST API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-module boolean flags keyed by module name
pub type ModuleFlags = BTreeMap<String, bool>;

/// Standard response envelope: `{success, message, data}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the server considers the call successful
    pub success: bool,
    /// Human-readable outcome
    #[serde(default)]
    pub message: String,
    /// Payload, absent on most failures
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// The payload of a successful envelope
    ///
    /// `None` when `success` is false or `data` is missing.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// Envelope without a payload (`{success, message}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Whether the server accepted the request
    pub success: bool,
    /// Human-readable outcome
    #[serde(default)]
    pub message: String,
}

/// A signed-in super admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Dialling prefix for `phone`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Identity provider
    pub provider: String,
    /// Role name
    pub role: String,
}

/// One half of a token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenValue {
    /// Opaque token string
    pub token: String,
    /// Expiry as sent by the server
    pub expires: String,
}

/// Session credential
///
/// Servers issue an access/refresh pair; sessions restored from the `token`
/// cookie only carry a single opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    /// Access and refresh tokens
    Pair {
        /// Short-lived bearer token
        access: TokenValue,
        /// Long-lived token used for logout and renewal
        refresh: TokenValue,
    },
    /// Single opaque credential
    Opaque(String),
}

impl Token {
    /// The string to send as `refreshToken` on logout
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        match self {
            Self::Pair { refresh, .. } => &refresh.token,
            Self::Opaque(token) => token,
        }
    }
}

/// `POST /super-admin/login` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// `POST /super-admin/send-verification-email` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpData {
    /// Email the passcode was sent to
    pub email: String,
    /// One-time passcode
    pub otp: String,
}

/// Payload of a successful OTP verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in user
    pub user: User,
    /// Issued credentials
    pub token: Token,
}

/// Envelope returned by OTP verification
pub type OtpResponse = ApiResponse<Session>;

/// `POST /super-admin/resend-otp` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendOtpPayload {
    /// Email to send a new passcode to
    pub email: String,
}

/// `POST /super-admin/logout` body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutToken {
    /// Refresh token to revoke
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Module list as returned by `POST /super-admin/modules`
///
/// Two server generations are in circulation and the client accepts both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModulesResponse {
    /// `{allModules, currentModule, useCoordinator, useProducer}`
    Catalog {
        /// Every module
        #[serde(rename = "allModules")]
        all_modules: Vec<String>,
        /// Active module
        #[serde(rename = "currentModule", default)]
        current_module: Option<String>,
        /// Coordinator flags
        #[serde(rename = "useCoordinator", default)]
        use_coordinator: ModuleFlags,
        /// Producer flags
        #[serde(rename = "useProducer", default)]
        use_producer: ModuleFlags,
    },
    /// `{modules, useCoordinator, useProducers}`
    Listing {
        /// Every module
        modules: Vec<String>,
        /// Coordinator flags
        #[serde(rename = "useCoordinator", default)]
        use_coordinator: ModuleFlags,
        /// Producer flags
        #[serde(rename = "useProducers", default)]
        use_producers: ModuleFlags,
    },
}

/// Module list normalized from either [`ModulesResponse`] shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCatalog {
    /// Modules in display order
    pub modules: Vec<String>,
    /// Active module, when the server reports it
    pub current_module: Option<String>,
    /// Coordinator flags
    pub use_coordinator: ModuleFlags,
    /// Producer flags
    pub use_producer: ModuleFlags,
}

impl From<ModulesResponse> for ModuleCatalog {
    fn from(response: ModulesResponse) -> Self {
        match response {
            ModulesResponse::Catalog {
                all_modules,
                current_module,
                use_coordinator,
                use_producer,
            } => Self {
                modules: all_modules,
                current_module,
                use_coordinator,
                use_producer,
            },
            ModulesResponse::Listing {
                modules,
                use_coordinator,
                use_producers,
            } => Self {
                modules,
                current_module: None,
                use_coordinator,
                use_producer: use_producers,
            },
        }
    }
}

/// `data` of the current-module endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentModule {
    /// Active module name
    #[serde(default)]
    pub current_module: Option<String>,
}

/// `PUT /super-admin/current-module` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSelection {
    /// Module to activate
    #[serde(rename = "moduleName")]
    pub module_name: String,
}

/// `PATCH /super-admin/profile/:id` body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfilePayload {
    /// Display name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Email address
    pub email: String,
    /// Dialling prefix for `phone`
    pub country_code: String,
}

/// Profile record returned after an update
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub provider: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_active: bool,
    pub is_deleted: bool,
}

/// Envelope returned by the profile update
pub type AdminProfileResponse = ApiResponse<AdminProfile>;

/// File uploaded alongside a coordinator update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name sent in the multipart part
    pub file_name: String,
    /// Raw JSON document
    pub contents: Vec<u8>,
}

/// Coordinator and producer toggles to save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorUpdate {
    /// Coordinator flags
    pub coordinator: ModuleFlags,
    /// Producer flags
    pub producer: ModuleFlags,
    /// Module the change applies to
    pub current_module: Option<String>,
    /// Optional configuration file
    pub attachment: Option<Attachment>,
}

/// `PATCH /super-admin/update-role` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleUpdate<'a> {
    /// Coordinator flags
    pub coordinator: &'a ModuleFlags,
    /// Producer flags
    pub producer: &'a ModuleFlags,
}

/// `data` of a coordinator save
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorSaved {
    /// Coordinator flags as stored by the server
    #[serde(rename = "updatedCoordinator", default)]
    pub coordinator: ModuleFlags,
    /// Producer flags as stored by the server
    #[serde(rename = "updatedProducer", default)]
    pub producers: ModuleFlags,
    /// URL of the uploaded file, if one was sent
    #[serde(rename = "assetUrl", alias = "asset_url", default)]
    pub asset_url: Option<String>,
}

/// Single-vendor flag, both as request body and response `data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleVendor {
    /// Whether the active module is restricted to one producer
    pub use_producer: bool,
}
