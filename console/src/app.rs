//! Composition root.
//!
//! [`Console`] owns one store per feature, wired to the same cookie jar and
//! API client. Front ends hold a `Console` and talk to the stores through it;
//! there is no global state.

use crate::auth::{AuthAction, AuthEnvironment, AuthReducer, AuthState};
use crate::config::{ConsoleConfig, OtpFailurePolicy};
use crate::dashboard::{DashboardAction, DashboardEnvironment, DashboardReducer, DashboardState};
use crate::navigation::{LogNavigator, Navigator};
use crate::validation::{self, ValidationErrors};
use admin_console_api::types::{AdminProfilePayload, CoordinatorUpdate};
use admin_console_api::{
    ApiClient, AuthApi, CredentialStorage, DashboardApi, FileCookieJar, HttpAuthApi,
    HttpDashboardApi,
};
use admin_console_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// How long convenience methods wait for a flow to finish
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Auth store
pub type AuthStore<A, N> = Store<AuthState, AuthAction, AuthEnvironment<A, N>, AuthReducer<A, N>>;

/// Dashboard store
pub type DashboardStore<D> =
    Store<DashboardState, DashboardAction, DashboardEnvironment<D>, DashboardReducer<D>>;

/// Errors from [`Console`] convenience methods
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Input rejected before dispatch
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The store refused the action or the flow did not finish in time
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Auth and dashboard stores sharing one cookie jar
pub struct Console<A = HttpAuthApi, D = HttpDashboardApi, N = LogNavigator>
where
    A: AuthApi + Clone + 'static,
    D: DashboardApi + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    auth: AuthStore<A, N>,
    dashboard: DashboardStore<D>,
    storage: Arc<dyn CredentialStorage>,
    response_timeout: Duration,
}

impl Console {
    /// Build a console talking to the configured API over HTTP
    ///
    /// Cookies live in the configured jar file; a previous session found
    /// there is restored.
    #[must_use]
    pub fn from_config(config: &ConsoleConfig) -> Self {
        let storage: Arc<dyn CredentialStorage> = Arc::new(FileCookieJar::new(&config.cookie_path));
        let client = ApiClient::new(config.api_base_url.clone(), Arc::clone(&storage));

        tracing::info!(
            api = %config.api_base_url,
            cookies = %config.cookie_path.display(),
            "Console configured"
        );

        Self::with_services(
            HttpAuthApi::new(client.clone()),
            HttpDashboardApi::new(client, config.coordinator_persistence),
            LogNavigator,
            storage,
            config.otp_failure_policy,
        )
    }
}

impl<A, D, N> Console<A, D, N>
where
    A: AuthApi + Clone + 'static,
    D: DashboardApi + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    /// Build a console from explicit services
    ///
    /// Both stores are hydrated from `storage` before they are created.
    #[must_use]
    pub fn with_services(
        auth_api: A,
        dashboard_api: D,
        navigator: N,
        storage: Arc<dyn CredentialStorage>,
        otp_failure_policy: OtpFailurePolicy,
    ) -> Self {
        let auth_state = AuthState::hydrate(storage.as_ref());
        let dashboard_state = DashboardState::hydrate(storage.as_ref());

        if auth_state.user.is_some() {
            tracing::debug!("Restored session from cookies");
        }

        let auth = Store::new(
            auth_state,
            AuthReducer::with_otp_failure_policy(otp_failure_policy),
            AuthEnvironment::new(auth_api, Arc::clone(&storage), navigator),
        );
        let dashboard = Store::new(
            dashboard_state,
            DashboardReducer::new(),
            DashboardEnvironment::new(dashboard_api, Arc::clone(&storage)),
        );

        Self {
            auth,
            dashboard,
            storage,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// Change how long convenience methods wait for a flow to finish
    #[must_use]
    pub const fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Auth store
    pub const fn auth(&self) -> &AuthStore<A, N> {
        &self.auth
    }

    /// Dashboard store
    pub const fn dashboard(&self) -> &DashboardStore<D> {
        &self.dashboard
    }

    /// Cookie jar shared by both stores and the API client
    pub const fn storage(&self) -> &Arc<dyn CredentialStorage> {
        &self.storage
    }

    /// Snapshot of the auth state
    pub async fn auth_state(&self) -> AuthState {
        self.auth.state(Clone::clone).await
    }

    /// Snapshot of the dashboard state
    pub async fn dashboard_state(&self) -> DashboardState {
        self.dashboard.state(Clone::clone).await
    }

    async fn run_auth<F>(&self, action: AuthAction, done: F) -> Result<AuthAction, ConsoleError>
    where
        F: Fn(&AuthAction) -> bool,
    {
        Ok(self
            .auth
            .send_and_wait_for(action, done, self.response_timeout)
            .await?)
    }

    async fn run_dashboard<F>(
        &self,
        action: DashboardAction,
        done: F,
    ) -> Result<DashboardAction, ConsoleError>
    where
        F: Fn(&DashboardAction) -> bool,
    {
        Ok(self
            .dashboard
            .send_and_wait_for(action, done, self.response_timeout)
            .await?)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Auth
    // ═══════════════════════════════════════════════════════════════════════

    /// Validate credentials, submit them and wait for the outcome
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Validation`] for bad input (nothing is dispatched),
    /// [`ConsoleError::Store`] if the store is shutting down or the flow
    /// times out.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthAction, ConsoleError> {
        let credentials = validation::validate_login(email, password)?;
        self.run_auth(
            AuthAction::LoginRequest {
                email: credentials.email,
                password: credentials.password,
            },
            |a| matches!(a, AuthAction::LoginSuccess { .. } | AuthAction::LoginFailure { .. }),
        )
        .await
    }

    /// Validate and submit a passcode and wait for the outcome
    ///
    /// # Errors
    ///
    /// See [`Console::login`].
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthAction, ConsoleError> {
        let otp = validation::validate_otp(email, otp)?;
        self.run_auth(AuthAction::VerifyOtpRequest(otp), |a| {
            matches!(
                a,
                AuthAction::VerifyOtpSuccess(_) | AuthAction::VerifyOtpFailure { .. }
            )
        })
        .await
    }

    /// Ask for a new passcode and wait for the outcome
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Store`] if the store is shutting down or the flow
    /// times out.
    pub async fn resend_otp(&self, email: &str) -> Result<AuthAction, ConsoleError> {
        self.run_auth(
            AuthAction::ResendOtpRequest {
                email: email.trim().to_string(),
            },
            |a| {
                matches!(
                    a,
                    AuthAction::ResendOtpSuccess { .. } | AuthAction::ResendOtpFailure { .. }
                )
            },
        )
        .await
    }

    /// End the session and wait until it is cleared
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn logout(&self) -> Result<AuthAction, ConsoleError> {
        self.run_auth(AuthAction::LogoutRequest { refresh_token: None }, |a| {
            matches!(a, AuthAction::LogoutSuccess | AuthAction::LogoutFailure { .. })
        })
        .await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Dashboard
    // ═══════════════════════════════════════════════════════════════════════

    /// Load the module catalog
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn fetch_modules(&self) -> Result<DashboardAction, ConsoleError> {
        self.run_dashboard(DashboardAction::FetchModulesRequest, |a| {
            matches!(
                a,
                DashboardAction::FetchModulesSuccess(_) | DashboardAction::FetchModulesFailure { .. }
            )
        })
        .await
    }

    /// Read the active module
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn fetch_current_module(&self) -> Result<DashboardAction, ConsoleError> {
        self.run_dashboard(DashboardAction::FetchCurrentModuleRequest, |a| {
            matches!(
                a,
                DashboardAction::FetchCurrentModuleSuccess(_)
                    | DashboardAction::FetchCurrentModuleFailure { .. }
            )
        })
        .await
    }

    /// Switch the active module on the server
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn update_current_module(
        &self,
        module_name: &str,
    ) -> Result<DashboardAction, ConsoleError> {
        self.run_dashboard(
            DashboardAction::UpdateCurrentModuleRequest {
                module_name: module_name.to_string(),
            },
            |a| {
                matches!(
                    a,
                    DashboardAction::UpdateCurrentModuleSuccess(_)
                        | DashboardAction::UpdateCurrentModuleFailure { .. }
                )
            },
        )
        .await
    }

    /// Select a module locally and remember it for the next start
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Store`] if the store is shutting down.
    pub async fn select_module(&self, module_name: &str) -> Result<(), ConsoleError> {
        let mut handle = self
            .dashboard
            .send(DashboardAction::SelectModule {
                module_name: module_name.to_string(),
            })
            .await?;
        handle.wait().await;
        Ok(())
    }

    /// Save the admin profile
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn update_admin_profile(
        &self,
        id: &str,
        profile: AdminProfilePayload,
    ) -> Result<DashboardAction, ConsoleError> {
        self.run_dashboard(
            DashboardAction::UpdateAdminProfileRequest {
                id: id.to_string(),
                profile,
            },
            |a| {
                matches!(
                    a,
                    DashboardAction::UpdateAdminProfileSuccess(_)
                        | DashboardAction::UpdateAdminProfileFailure { .. }
                )
            },
        )
        .await
    }

    /// Save coordinator and producer toggles
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn update_coordinator(
        &self,
        update: CoordinatorUpdate,
    ) -> Result<DashboardAction, ConsoleError> {
        self.run_dashboard(DashboardAction::UpdateCoordinatorRequest(update), |a| {
            matches!(
                a,
                DashboardAction::UpdateCoordinatorSuccess { .. }
                    | DashboardAction::UpdateCoordinatorFailure { .. }
            )
        })
        .await
    }

    /// Read the single-vendor flag
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn fetch_single_vendor(&self) -> Result<DashboardAction, ConsoleError> {
        self.run_dashboard(DashboardAction::FetchSingleVendorRequest, |a| {
            matches!(
                a,
                DashboardAction::FetchSingleVendorSuccess(_)
                    | DashboardAction::FetchSingleVendorFailure { .. }
            )
        })
        .await
    }

    /// Save the single-vendor flag
    ///
    /// # Errors
    ///
    /// See [`Console::resend_otp`].
    pub async fn update_single_vendor(
        &self,
        use_producer: bool,
    ) -> Result<DashboardAction, ConsoleError> {
        self.run_dashboard(DashboardAction::UpdateSingleVendorRequest { use_producer }, |a| {
            matches!(
                a,
                DashboardAction::UpdateSingleVendorSuccess(_)
                    | DashboardAction::UpdateSingleVendorFailure { .. }
            )
        })
        .await
    }

    /// Stop both stores, waiting up to `timeout` for running effects
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] if effects are still running.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.auth.shutdown(timeout).await?;
        self.dashboard.shutdown(timeout).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::{AuthCall, MockAuthApi, MockDashboardApi, RecordingNavigator};
    use admin_console_api::storage::keys;
    use admin_console_api::MemoryCookieJar;

    fn console(jar: Arc<MemoryCookieJar>) -> Console<MockAuthApi, MockDashboardApi, RecordingNavigator> {
        Console::with_services(
            MockAuthApi::new(),
            MockDashboardApi::new(),
            RecordingNavigator::new(),
            jar,
            OtpFailurePolicy::default(),
        )
        .with_response_timeout(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn invalid_login_is_never_dispatched() {
        let console = console(Arc::new(MemoryCookieJar::new()));

        let error = console.login("not-an-email", "123").await.unwrap_err();

        let ConsoleError::Validation(fields) = error else {
            unreachable!("expected validation error");
        };
        assert_eq!(fields.get("email"), Some("Invalid email address"));
        assert!(!console.auth_state().await.loading);
    }

    #[tokio::test]
    async fn hydrates_both_stores_from_cookies() {
        let jar = Arc::new(MemoryCookieJar::new());
        jar.set(keys::TOKEN, "refresh-abc").unwrap();
        jar.set(keys::SELECTED_MODULE, "\"Retail\"").unwrap();

        let console = console(jar);

        assert_eq!(console.auth_state().await.refresh_token(), Some("refresh-abc"));
        assert_eq!(
            console.dashboard_state().await.current_module.as_deref(),
            Some("Retail")
        );
    }

    #[tokio::test]
    async fn logout_revokes_hydrated_refresh_token() {
        let jar = Arc::new(MemoryCookieJar::new());
        jar.set(keys::TOKEN, "refresh-abc").unwrap();
        let auth_api = MockAuthApi::new();
        auth_api.respond_logout(Ok(()));
        let console = Console::with_services(
            auth_api.clone(),
            MockDashboardApi::new(),
            RecordingNavigator::new(),
            jar.clone(),
            OtpFailurePolicy::default(),
        );

        let outcome = console.logout().await.unwrap();

        assert_eq!(outcome, AuthAction::LogoutSuccess);
        assert_eq!(
            auth_api.calls(),
            vec![AuthCall::Logout(Some("refresh-abc".to_string()))]
        );
        assert_eq!(jar.get(keys::TOKEN), None);
    }

    #[tokio::test]
    async fn select_module_waits_for_cookie() {
        let jar = Arc::new(MemoryCookieJar::new());
        let console = console(jar.clone());

        console.select_module("Retail").await.unwrap();

        assert_eq!(jar.get(keys::SELECTED_MODULE).as_deref(), Some("\"Retail\""));
    }
}
