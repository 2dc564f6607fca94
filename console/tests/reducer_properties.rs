//! Reducer properties over generated action sequences.

#![allow(clippy::unwrap_used)]

use admin_console::auth::{AuthAction, AuthEnvironment, AuthReducer, AuthState};
use admin_console::dashboard::{
    DashboardAction, DashboardEnvironment, DashboardReducer, DashboardState,
};
use admin_console::mocks::{MockAuthApi, MockDashboardApi, RecordingNavigator};
use admin_console::OtpFailurePolicy;
use admin_console_api::types::{ModuleCatalog, OtpData, OtpResponse};
use admin_console_api::MemoryCookieJar;
use admin_console_core::reducer::Reducer;
use admin_console_testing::properties::{email, maybe_text, text};
use proptest::prelude::*;
use std::sync::Arc;

type Auth = AuthReducer<MockAuthApi, RecordingNavigator>;
type Dashboard = DashboardReducer<MockDashboardApi>;

fn auth_env() -> AuthEnvironment<MockAuthApi, RecordingNavigator> {
    AuthEnvironment::new(
        MockAuthApi::new(),
        Arc::new(MemoryCookieJar::new()),
        RecordingNavigator::new(),
    )
}

fn dashboard_env() -> DashboardEnvironment<MockDashboardApi> {
    DashboardEnvironment::new(MockDashboardApi::new(), Arc::new(MemoryCookieJar::new()))
}

fn auth_action() -> impl Strategy<Value = AuthAction> {
    prop_oneof![
        (email(), text()).prop_map(|(email, password)| AuthAction::LoginRequest { email, password }),
        text().prop_map(|message| AuthAction::LoginSuccess { message }),
        text().prop_map(|error| AuthAction::LoginFailure { error }),
        (email(), "[0-9]{6}").prop_map(|(email, otp)| AuthAction::VerifyOtpRequest(OtpData { email, otp })),
        (any::<bool>(), text()).prop_map(|(success, message)| {
            AuthAction::VerifyOtpSuccess(OtpResponse {
                success,
                message,
                data: None,
            })
        }),
        text().prop_map(|error| AuthAction::VerifyOtpFailure { error }),
        email().prop_map(|email| AuthAction::ResendOtpRequest { email }),
        (any::<bool>(), text()).prop_map(|(success, message)| AuthAction::ResendOtpSuccess { success, message }),
        text().prop_map(|error| AuthAction::ResendOtpFailure { error }),
        maybe_text().prop_map(|refresh_token| AuthAction::LogoutRequest { refresh_token }),
        Just(AuthAction::LogoutSuccess),
        text().prop_map(|error| AuthAction::LogoutFailure { error }),
        Just(AuthAction::ClearAuthMessages),
    ]
}

fn module() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["E-learning", "Retail", "Health", "Travel"]).prop_map(str::to_string)
}

fn dashboard_action() -> impl Strategy<Value = DashboardAction> {
    prop_oneof![
        Just(DashboardAction::FetchModulesRequest),
        (
            prop::collection::vec(module(), 0..4),
            proptest::option::of(module())
        )
            .prop_map(|(modules, current_module)| {
                DashboardAction::FetchModulesSuccess(ModuleCatalog {
                    modules,
                    current_module,
                    ..ModuleCatalog::default()
                })
            }),
        text().prop_map(|error| DashboardAction::FetchModulesFailure { error }),
        proptest::option::of(module()).prop_map(DashboardAction::FetchCurrentModuleSuccess),
        module().prop_map(|module_name| DashboardAction::UpdateCurrentModuleRequest { module_name }),
        proptest::option::of(module()).prop_map(DashboardAction::UpdateCurrentModuleSuccess),
        text().prop_map(|error| DashboardAction::UpdateCurrentModuleFailure { error }),
        Just(DashboardAction::ResetUpdateCurrentModule),
        module().prop_map(|module_name| DashboardAction::SelectModule { module_name }),
        Just(DashboardAction::ClearLoading),
        any::<bool>().prop_map(DashboardAction::UpdateSingleVendorSuccess),
        any::<bool>().prop_map(DashboardAction::FetchSingleVendorSuccess),
    ]
}

fn reduce_auth(state: &AuthState, actions: &[AuthAction]) -> AuthState {
    let reducer = Auth::with_otp_failure_policy(OtpFailurePolicy::ResetAuthentication);
    let env = auth_env();
    let mut state = state.clone();
    for action in actions {
        let _ = reducer.reduce(&mut state, action.clone(), &env);
    }
    state
}

fn reduce_dashboard(actions: &[DashboardAction]) -> DashboardState {
    let reducer = Dashboard::new();
    let env = dashboard_env();
    let mut state = DashboardState::default();
    for action in actions {
        let _ = reducer.reduce(&mut state, action.clone(), &env);
    }
    state
}

proptest! {
    #[test]
    fn auth_reduction_is_deterministic(actions in prop::collection::vec(auth_action(), 0..16)) {
        let start = AuthState::default();
        prop_assert_eq!(reduce_auth(&start, &actions), reduce_auth(&start, &actions));
    }

    #[test]
    fn dashboard_reduction_is_deterministic(actions in prop::collection::vec(dashboard_action(), 0..16)) {
        prop_assert_eq!(reduce_dashboard(&actions), reduce_dashboard(&actions));
    }

    #[test]
    fn clear_auth_messages_is_idempotent(actions in prop::collection::vec(auth_action(), 0..16)) {
        let once = reduce_auth(&AuthState::default(), &[actions.clone(), vec![AuthAction::ClearAuthMessages]].concat());
        let twice = reduce_auth(&once, &[AuthAction::ClearAuthMessages]);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.login_message.as_str(), "");
        prop_assert_eq!(once.error, None);
    }

    #[test]
    fn logout_success_always_clears_session(actions in prop::collection::vec(auth_action(), 0..16)) {
        let state = reduce_auth(&AuthState::default(), &[actions, vec![AuthAction::LogoutSuccess]].concat());
        prop_assert!(state.user.is_none());
        prop_assert!(state.token.is_none());
        prop_assert!(!state.is_authenticated);
        prop_assert!(!state.loading);
    }

    #[test]
    fn only_verification_authenticates(actions in prop::collection::vec(auth_action(), 0..16)) {
        let mut state = AuthState::default();
        let reducer = Auth::new();
        let env = auth_env();
        for action in actions {
            let verifies = matches!(&action, AuthAction::VerifyOtpSuccess(r) if r.success);
            let before = state.is_authenticated;
            let _ = reducer.reduce(&mut state, action, &env);
            if !before && state.is_authenticated {
                prop_assert!(verifies);
            }
        }
    }

    #[test]
    fn current_module_stays_within_known_modules(actions in prop::collection::vec(dashboard_action(), 0..24)) {
        let state = reduce_dashboard(&actions);
        if let Some(current) = &state.current_module {
            prop_assert!(state.modules.is_empty() || state.modules.contains(current));
        }
    }
}
