//! Typed service traits over the REST endpoints.
//!
//! Effects depend on [`AuthApi`] and [`DashboardApi`] rather than on
//! [`ApiClient`] so tests can substitute scripted implementations.
//! Services return the server's envelope untouched; deciding what a
//! `success: false` envelope means is left to the caller.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    Acknowledgement, AdminProfilePayload, AdminProfileResponse, ApiResponse, CoordinatorSaved,
    CoordinatorUpdate, CurrentModule, LoginCredentials, LogoutToken, ModuleSelection,
    ModulesResponse, OtpData, OtpResponse, ResendOtpPayload, RoleUpdate, SingleVendor,
};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Authentication endpoints
pub trait AuthApi: Send + Sync {
    /// `POST /super-admin/login`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> impl Future<Output = Result<Acknowledgement, ApiError>> + Send;

    /// `POST /super-admin/send-verification-email`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn verify_otp(&self, otp: &OtpData)
    -> impl Future<Output = Result<OtpResponse, ApiError>> + Send;

    /// `POST /super-admin/resend-otp`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn resend_otp(
        &self,
        payload: &ResendOtpPayload,
    ) -> impl Future<Output = Result<Acknowledgement, ApiError>> + Send;

    /// `POST /super-admin/logout`; the response body is ignored
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn logout(&self, token: &LogoutToken) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// How coordinator toggles are saved
///
/// Deployments differ in which endpoint they expose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinatorPersistence {
    /// `PATCH /super-admin/update-module` as multipart, optionally with a file
    #[default]
    ModuleUpload,
    /// `PATCH /super-admin/update-role` as JSON; attachments are rejected
    RoleJson,
}

/// Dashboard endpoints
pub trait DashboardApi: Send + Sync {
    /// `POST /super-admin/modules`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn fetch_modules(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<ModulesResponse>, ApiError>> + Send;

    /// `POST /super-admin/current-module`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn fetch_current_module(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<CurrentModule>, ApiError>> + Send;

    /// `PUT /super-admin/current-module`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn update_current_module(
        &self,
        module_name: &str,
    ) -> impl Future<Output = Result<ApiResponse<CurrentModule>, ApiError>> + Send;

    /// `PATCH /super-admin/profile/:id`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn update_admin_profile(
        &self,
        id: &str,
        profile: &AdminProfilePayload,
    ) -> impl Future<Output = Result<AdminProfileResponse, ApiError>> + Send;

    /// Save coordinator and producer toggles
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`], or [`ApiError::RequestSetup`] when
    /// the configured endpoint cannot carry the update.
    fn update_coordinator(
        &self,
        update: &CoordinatorUpdate,
    ) -> impl Future<Output = Result<ApiResponse<CoordinatorSaved>, ApiError>> + Send;

    /// `POST /super-admin/single-vendor`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn fetch_single_vendor(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<SingleVendor>, ApiError>> + Send;

    /// `PUT /super-admin/single-vendor`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    fn update_single_vendor(
        &self,
        use_producer: bool,
    ) -> impl Future<Output = Result<ApiResponse<SingleVendor>, ApiError>> + Send;
}

/// [`AuthApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: ApiClient,
}

impl HttpAuthApi {
    /// Wrap a gateway client
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Acknowledgement, ApiError> {
        self.client.post("/super-admin/login", credentials).await
    }

    async fn verify_otp(&self, otp: &OtpData) -> Result<OtpResponse, ApiError> {
        self.client
            .post("/super-admin/send-verification-email", otp)
            .await
    }

    async fn resend_otp(&self, payload: &ResendOtpPayload) -> Result<Acknowledgement, ApiError> {
        self.client.post("/super-admin/resend-otp", payload).await
    }

    async fn logout(&self, token: &LogoutToken) -> Result<(), ApiError> {
        self.client
            .post::<_, serde::de::IgnoredAny>("/super-admin/logout", token)
            .await
            .map(|_| ())
    }
}

/// [`DashboardApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    client: ApiClient,
    persistence: CoordinatorPersistence,
}

impl HttpDashboardApi {
    /// Wrap a gateway client
    #[must_use]
    pub const fn new(client: ApiClient, persistence: CoordinatorPersistence) -> Self {
        Self {
            client,
            persistence,
        }
    }

    fn module_upload_form(update: &CoordinatorUpdate) -> Result<Form, ApiError> {
        let setup = |e: &dyn std::fmt::Display| ApiError::RequestSetup {
            detail: e.to_string(),
        };

        let coordinator = serde_json::to_string(&update.coordinator).map_err(|e| setup(&e))?;
        let producer = serde_json::to_string(&update.producer).map_err(|e| setup(&e))?;

        let mut form = Form::new()
            .text("coordinator", coordinator)
            .text("producer", producer);

        if let Some(module) = &update.current_module {
            form = form.text("currentModule", module.clone());
        }

        if let Some(attachment) = &update.attachment {
            let part = Part::bytes(attachment.contents.clone())
                .file_name(attachment.file_name.clone())
                .mime_str("application/json")
                .map_err(|e| setup(&e))?;
            form = form.part("file", part);
        }

        Ok(form)
    }
}

impl DashboardApi for HttpDashboardApi {
    async fn fetch_modules(&self) -> Result<ApiResponse<ModulesResponse>, ApiError> {
        self.client.post_empty("/super-admin/modules").await
    }

    async fn fetch_current_module(&self) -> Result<ApiResponse<CurrentModule>, ApiError> {
        self.client.post_empty("/super-admin/current-module").await
    }

    async fn update_current_module(
        &self,
        module_name: &str,
    ) -> Result<ApiResponse<CurrentModule>, ApiError> {
        let selection = ModuleSelection {
            module_name: module_name.to_string(),
        };
        self.client
            .put("/super-admin/current-module", &selection)
            .await
    }

    async fn update_admin_profile(
        &self,
        id: &str,
        profile: &AdminProfilePayload,
    ) -> Result<AdminProfileResponse, ApiError> {
        self.client.patch(&profile_path(id)?, profile).await
    }

    async fn update_coordinator(
        &self,
        update: &CoordinatorUpdate,
    ) -> Result<ApiResponse<CoordinatorSaved>, ApiError> {
        match self.persistence {
            CoordinatorPersistence::ModuleUpload => {
                let form = Self::module_upload_form(update)?;
                self.client
                    .patch_multipart("/super-admin/update-module", form)
                    .await
            },
            CoordinatorPersistence::RoleJson => {
                if update.attachment.is_some() {
                    tracing::error!("Attachment cannot be sent to the role endpoint");
                    return Err(ApiError::RequestSetup {
                        detail: "file attachments require module upload persistence".to_string(),
                    });
                }
                let body = RoleUpdate {
                    coordinator: &update.coordinator,
                    producer: &update.producer,
                };
                self.client.patch("/super-admin/update-role", &body).await
            },
        }
    }

    async fn fetch_single_vendor(&self) -> Result<ApiResponse<SingleVendor>, ApiError> {
        self.client.post_empty("/super-admin/single-vendor").await
    }

    async fn update_single_vendor(
        &self,
        use_producer: bool,
    ) -> Result<ApiResponse<SingleVendor>, ApiError> {
        self.client
            .put("/super-admin/single-vendor", &SingleVendor { use_producer })
            .await
    }
}

/// `/super-admin/profile/:id` with `id` encoded as a single path segment
fn profile_path(id: &str) -> Result<String, ApiError> {
    let mut url = reqwest::Url::parse("http://localhost/super-admin/profile").map_err(|error| {
        ApiError::RequestSetup {
            detail: error.to_string(),
        }
    })?;
    url.path_segments_mut()
        .map_err(|()| ApiError::RequestSetup {
            detail: "URL cannot carry path segments".to_string(),
        })?
        .push(id);
    Ok(url.path().to_string())
}
