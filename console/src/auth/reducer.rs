//! Authentication reducer.
//!
//! # Flow
//!
//! 1. `LoginRequest` submits credentials; success only means a passcode was sent
//! 2. `VerifyOtpRequest` submits the passcode; success authenticates the
//!    session and persists it
//! 3. `ResendOtpRequest` runs independently and only touches the resend fields
//! 4. `LogoutRequest` always ends with a cleared session

use super::actions::AuthAction;
use super::effects;
use super::environment::AuthEnvironment;
use super::state::AuthState;
use crate::config::OtpFailurePolicy;
use crate::navigation::Navigator;
use admin_console_api::types::LoginCredentials;
use admin_console_api::AuthApi;
use admin_console_core::effect::Effect;
use admin_console_core::reducer::Reducer;
use admin_console_core::{smallvec, SmallVec};
use std::sync::Arc;

/// Authentication reducer.
#[derive(Debug, Clone)]
pub struct AuthReducer<A, N> {
    /// Effect of `VerifyOtpFailure` on an existing session.
    otp_failure_policy: OtpFailurePolicy,
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(A, N)>,
}

impl<A, N> AuthReducer<A, N> {
    /// Create a reducer with the default OTP failure policy.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_otp_failure_policy(OtpFailurePolicy::PreserveSession)
    }

    /// Create a reducer with an explicit OTP failure policy.
    #[must_use]
    pub const fn with_otp_failure_policy(policy: OtpFailurePolicy) -> Self {
        Self {
            otp_failure_policy: policy,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A, N> Default for AuthReducer<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N> Reducer for AuthReducer<A, N>
where
    A: AuthApi + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment<A, N>;

    #[allow(clippy::too_many_lines)] // One arm per action keeps the transition table readable
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Login
            // ═══════════════════════════════════════════════════════════════
            AuthAction::LoginRequest { email, password } => {
                state.loading = true;
                state.error = None;

                smallvec![effects::login(
                    env.api.clone(),
                    LoginCredentials { email, password }
                )]
            },

            AuthAction::LoginSuccess { message } => {
                state.loading = false;
                state.error = None;
                state.login_message = message;
                state.otp_sent = true;
                SmallVec::new()
            },

            AuthAction::LoginFailure { error } => {
                state.loading = false;
                state.error = Some(error);
                state.otp_sent = false;
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // OTP verification
            // ═══════════════════════════════════════════════════════════════
            AuthAction::VerifyOtpRequest(otp) => {
                state.loading = true;
                state.error = None;

                smallvec![effects::verify_otp(env.api.clone(), otp)]
            },

            AuthAction::VerifyOtpSuccess(response) => {
                state.loading = false;
                if let Some(session) = &response.data {
                    state.token = Some(session.token.clone());
                    state.user = Some(session.user.clone());
                }
                state.is_authenticated = response.success;

                let session = response.data.clone().filter(|_| response.success);
                state.otp_response = Some(response);

                match session {
                    Some(session) => smallvec![effects::open_session(
                        Arc::clone(&env.storage),
                        env.navigator.clone(),
                        session,
                    )],
                    None => SmallVec::new(),
                }
            },

            AuthAction::VerifyOtpFailure { error } => {
                state.loading = false;
                state.error = Some(error);
                if self.otp_failure_policy == OtpFailurePolicy::ResetAuthentication {
                    state.is_authenticated = false;
                }
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // OTP resend
            // ═══════════════════════════════════════════════════════════════
            AuthAction::ResendOtpRequest { email } => {
                state.is_loading = true;
                smallvec![effects::resend_otp(env.api.clone(), email)]
            },

            AuthAction::ResendOtpSuccess { success, message } => {
                state.is_loading = false;
                state.success = success;
                state.message = message;
                SmallVec::new()
            },

            AuthAction::ResendOtpFailure { error } => {
                state.is_loading = false;
                state.success = false;
                state.message = error;
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // Logout
            // ═══════════════════════════════════════════════════════════════
            AuthAction::LogoutRequest { refresh_token } => {
                state.loading = true;
                state.error = None;

                let refresh_token =
                    refresh_token.or_else(|| state.refresh_token().map(str::to_string));

                smallvec![effects::logout(
                    env.api.clone(),
                    Arc::clone(&env.storage),
                    env.navigator.clone(),
                    refresh_token,
                )]
            },

            AuthAction::LogoutSuccess => {
                state.loading = false;
                state.error = None;
                state.user = None;
                state.token = None;
                state.is_authenticated = false;
                state.otp_sent = false;
                state.otp_response = None;
                SmallVec::new()
            },

            AuthAction::LogoutFailure { error } => {
                state.loading = false;
                state.user = None;
                state.is_authenticated = false;
                state.error = Some(error);
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════
            // Housekeeping
            // ═══════════════════════════════════════════════════════════════
            AuthAction::ClearAuthMessages => {
                state.login_message.clear();
                state.error = None;
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockAuthApi, RecordingNavigator};
    use admin_console_api::types::{OtpResponse, Session, Token, TokenValue, User};
    use crate::navigation::routes;
    use admin_console_api::storage::keys;
    use admin_console_api::{CredentialStorage, MemoryCookieJar};
    use admin_console_testing::{assertions, ReducerTest};

    type TestReducer = AuthReducer<MockAuthApi, RecordingNavigator>;

    fn env() -> AuthEnvironment<MockAuthApi, RecordingNavigator> {
        AuthEnvironment::new(
            MockAuthApi::new(),
            Arc::new(MemoryCookieJar::new()),
            RecordingNavigator::new(),
        )
    }

    fn verified() -> OtpResponse {
        OtpResponse {
            success: true,
            message: "Verified".to_string(),
            data: Some(Session {
                user: User {
                    id: "u1".to_string(),
                    name: "Root".to_string(),
                    email: Some("root@example.com".to_string()),
                    phone: None,
                    country_code: None,
                    provider: "local".to_string(),
                    role: "super-admin".to_string(),
                },
                token: Token::Pair {
                    access: TokenValue {
                        token: "acc".to_string(),
                        expires: "2025-01-01T01:00:00Z".to_string(),
                    },
                    refresh: TokenValue {
                        token: "ref".to_string(),
                        expires: "2025-01-31T00:00:00Z".to_string(),
                    },
                },
            }),
        }
    }

    #[test]
    fn login_request_starts_loading_and_claims_login() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                error: Some("old".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::LoginRequest {
                email: "root@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .then_state(|s| {
                assert!(s.loading);
                assert_eq!(s.error, None);
                assert!(s.user.is_none());
            })
            .then_effects(|e| assertions::assert_has_cancellable_effect(e, effects::LOGIN))
            .run();
    }

    #[test]
    fn login_success_sends_otp_without_authenticating() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::LoginSuccess {
                message: "OTP sent".to_string(),
            })
            .then_state(|s| {
                assert!(!s.loading);
                assert!(s.otp_sent);
                assert_eq!(s.login_message, "OTP sent");
                assert!(!s.is_authenticated);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn verify_success_authenticates() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::VerifyOtpSuccess(verified()))
            .then_state(|s| {
                assert!(s.is_authenticated);
                assert_eq!(s.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
                assert_eq!(s.refresh_token(), Some("ref"));
                assert_eq!(s.otp_response, Some(verified()));
            })
            .then_effects(|e| {
                assertions::assert_effects_count(e, 1);
                assertions::assert_has_future_effect(e);
                assertions::assert_no_cancellable_effects(e);
            })
            .run();
    }

    #[test]
    fn unsuccessful_verification_opens_no_session() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::VerifyOtpSuccess(OtpResponse {
                success: false,
                ..verified()
            }))
            .then_state(|s| assert!(!s.is_authenticated))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn open_session_persists_and_navigates() {
        let jar = Arc::new(MemoryCookieJar::new());
        let navigator = RecordingNavigator::new();
        let Some(session) = verified().data else {
            unreachable!("fixture carries a session");
        };

        let action = admin_console_testing::helpers::resolve_effect(effects::open_session(
            jar.clone(),
            navigator.clone(),
            session,
        ))
        .await;

        assert_eq!(action, None);
        assert_eq!(jar.get(keys::TOKEN).as_deref(), Some("ref"));
        assert!(jar.get(keys::USER).is_some());
        assert_eq!(navigator.routes(), vec![routes::DASHBOARD.to_string()]);
    }

    #[test]
    fn verify_failure_respects_policy() {
        let authenticated = AuthState {
            is_authenticated: true,
            ..AuthState::default()
        };
        let failure = AuthAction::VerifyOtpFailure {
            error: "Invalid OTP".to_string(),
        };

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(authenticated.clone())
            .when_action(failure.clone())
            .then_state(|s| {
                assert!(s.is_authenticated);
                assert_eq!(s.error.as_deref(), Some("Invalid OTP"));
            })
            .run();

        ReducerTest::new(TestReducer::with_otp_failure_policy(
            OtpFailurePolicy::ResetAuthentication,
        ))
        .with_env(env())
        .given_state(authenticated)
        .when_action(failure)
        .then_state(|s| assert!(!s.is_authenticated))
        .run();
    }

    #[test]
    fn resend_failure_leaves_primary_error_alone() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                error: Some("Invalid OTP".to_string()),
                success: true,
                ..AuthState::default()
            })
            .when_actions([
                AuthAction::ResendOtpRequest {
                    email: "root@example.com".to_string(),
                },
                AuthAction::ResendOtpFailure {
                    error: "Too many requests".to_string(),
                },
            ])
            .then_state(|s| {
                assert!(!s.is_loading);
                assert!(!s.success);
                assert_eq!(s.message, "Too many requests");
                assert_eq!(s.error.as_deref(), Some("Invalid OTP"));
                assert!(!s.loading);
            })
            .run();
    }

    #[test]
    fn logout_success_clears_session() {
        let mut state = AuthState::default();
        TestReducer::new().reduce(&mut state, AuthAction::VerifyOtpSuccess(verified()), &env());

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(AuthAction::LogoutSuccess)
            .then_state(|s| {
                assert!(s.user.is_none());
                assert!(s.token.is_none());
                assert!(!s.is_authenticated);
                assert!(s.otp_response.is_none());
            })
            .run();
    }

    #[test]
    fn logout_failure_clears_user_and_records_error() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                is_authenticated: true,
                loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::LogoutFailure {
                error: "Something went wrong".to_string(),
            })
            .then_state(|s| {
                assert!(!s.loading);
                assert!(!s.is_authenticated);
                assert_eq!(s.error.as_deref(), Some("Something went wrong"));
            })
            .run();
    }

    #[test]
    fn clear_auth_messages_is_idempotent() {
        let reducer = TestReducer::new();
        let env = env();
        let mut once = AuthState {
            login_message: "OTP sent".to_string(),
            error: Some("boom".to_string()),
            otp_sent: true,
            ..AuthState::default()
        };
        reducer.reduce(&mut once, AuthAction::ClearAuthMessages, &env);
        let mut twice = once.clone();
        reducer.reduce(&mut twice, AuthAction::ClearAuthMessages, &env);

        assert_eq!(once, twice);
        assert_eq!(once.login_message, "");
        assert!(once.otp_sent);
    }
}
