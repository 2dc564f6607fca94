//! Authentication effect routines.
//!
//! Every request routine is latest-wins under its own [`EffectId`] and
//! resolves to exactly one terminal action. A routine that panics still
//! terminates with its failure action. [`open_session`] is the exception: it
//! follows an applied verification and dispatches nothing.

use super::actions::AuthAction;
use crate::navigation::{routes, Navigator};
use admin_console_api::storage::keys;
use admin_console_api::types::{LoginCredentials, LogoutToken, OtpData, ResendOtpPayload, Session};
use admin_console_api::{AuthApi, CredentialStorage, CredentialStorageExt};
use admin_console_core::effect::{Effect, EffectId};
use admin_console_core::{async_effect, latest};
use std::sync::Arc;

/// Credential submission
pub const LOGIN: EffectId = EffectId::new("auth/login");
/// OTP verification
pub const VERIFY_OTP: EffectId = EffectId::new("auth/verifyOtp");
/// OTP resend
pub const RESEND_OTP: EffectId = EffectId::new("auth/resendOtp");
/// Logout
pub const LOGOUT: EffectId = EffectId::new("auth/logout");

fn or_default(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Submit credentials; a `success: false` answer is a failure
pub fn login<A>(api: A, credentials: LoginCredentials) -> Effect<AuthAction>
where
    A: AuthApi + 'static,
{
    latest! {
        id: LOGIN,
        routine: async move {
            match api.login(&credentials).await {
                Ok(ack) if ack.success => AuthAction::LoginSuccess { message: ack.message },
                Ok(ack) => AuthAction::LoginFailure {
                    error: or_default(ack.message, "Login failed"),
                },
                Err(error) => AuthAction::LoginFailure {
                    error: error.to_string(),
                },
            }
        },
        on_panic: |error| AuthAction::LoginFailure { error }
    }
}

/// Verify the passcode
///
/// Persisting the session is left to [`open_session`], which only runs once
/// the verification has actually been applied.
pub fn verify_otp<A>(api: A, otp: OtpData) -> Effect<AuthAction>
where
    A: AuthApi + 'static,
{
    latest! {
        id: VERIFY_OTP,
        routine: async move {
            let response = match api.verify_otp(&otp).await {
                Ok(response) => response,
                Err(error) => {
                    return AuthAction::VerifyOtpFailure {
                        error: error.to_string(),
                    };
                },
            };

            if response.success && response.data.is_some() {
                AuthAction::VerifyOtpSuccess(response)
            } else {
                AuthAction::VerifyOtpFailure {
                    error: or_default(response.message, "OTP verification failed"),
                }
            }
        },
        on_panic: |error| AuthAction::VerifyOtpFailure { error }
    }
}

/// Persist a verified session and open the dashboard
pub fn open_session<N>(
    storage: Arc<dyn CredentialStorage>,
    navigator: N,
    session: Session,
) -> Effect<AuthAction>
where
    N: Navigator + 'static,
{
    async_effect! {
        if let Err(error) = storage.set(keys::TOKEN, session.token.refresh_token()) {
            tracing::warn!(%error, "Failed to persist session token");
        }
        if let Err(error) = storage.set_json(keys::USER, &session.user) {
            tracing::warn!(%error, "Failed to persist session user");
        }
        navigator.navigate(routes::DASHBOARD);
        None
    }
}

/// Ask for a new passcode
pub fn resend_otp<A>(api: A, email: String) -> Effect<AuthAction>
where
    A: AuthApi + 'static,
{
    latest! {
        id: RESEND_OTP,
        routine: async move {
            let payload = ResendOtpPayload { email };
            match api.resend_otp(&payload).await {
                Ok(ack) => AuthAction::ResendOtpSuccess {
                    success: ack.success,
                    message: ack.message,
                },
                Err(error) => AuthAction::ResendOtpFailure {
                    error: error.to_string(),
                },
            }
        },
        on_panic: |error| AuthAction::ResendOtpFailure { error }
    }
}

/// Revoke the refresh token if one is known, then clear the local session
///
/// The server call is best effort: the local session is cleared even when
/// it fails.
pub fn logout<A, N>(
    api: A,
    storage: Arc<dyn CredentialStorage>,
    navigator: N,
    refresh_token: Option<String>,
) -> Effect<AuthAction>
where
    A: AuthApi + 'static,
    N: Navigator + 'static,
{
    latest! {
        id: LOGOUT,
        routine: async move {
            if refresh_token.is_some() {
                let token = LogoutToken { refresh_token };
                if let Err(error) = api.logout(&token).await {
                    tracing::warn!(%error, "Server logout failed, clearing local session anyway");
                }
            } else {
                tracing::debug!("No refresh token known, skipping server logout");
            }

            for key in [keys::TOKEN, keys::USER] {
                if let Err(error) = storage.remove(key) {
                    tracing::warn!(key, %error, "Failed to clear cookie");
                }
            }

            navigator.navigate(routes::HOME);
            AuthAction::LogoutSuccess
        },
        on_panic: |error| AuthAction::LogoutFailure { error }
    }
}
