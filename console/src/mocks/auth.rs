//! Mock auth endpoints.

use super::{CallLog, Script};
use admin_console_api::types::{
    Acknowledgement, LoginCredentials, LogoutToken, OtpData, OtpResponse, ResendOtpPayload,
};
use admin_console_api::{ApiError, AuthApi};
use std::time::Duration;

/// A call that reached [`MockAuthApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    /// `login`
    Login(LoginCredentials),
    /// `verify_otp`
    VerifyOtp(OtpData),
    /// `resend_otp` with the email
    ResendOtp(String),
    /// `logout` with the refresh token sent
    Logout(Option<String>),
}

/// Scripted [`AuthApi`].
#[derive(Debug, Clone, Default)]
pub struct MockAuthApi {
    login: Script<Acknowledgement>,
    verify_otp: Script<OtpResponse>,
    resend_otp: Script<Acknowledgement>,
    logout: Script<()>,
    calls: CallLog<AuthCall>,
}

impl MockAuthApi {
    /// Create a mock with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a login answer
    pub fn respond_login(&self, result: Result<Acknowledgement, ApiError>) {
        self.login.push(Duration::ZERO, result);
    }

    /// Queue a login answer that arrives after `delay`
    pub fn respond_login_after(&self, delay: Duration, result: Result<Acknowledgement, ApiError>) {
        self.login.push(delay, result);
    }

    /// Queue a verification answer
    pub fn respond_verify_otp(&self, result: Result<OtpResponse, ApiError>) {
        self.verify_otp.push(Duration::ZERO, result);
    }

    /// Queue a verification answer that arrives after `delay`
    pub fn respond_verify_otp_after(&self, delay: Duration, result: Result<OtpResponse, ApiError>) {
        self.verify_otp.push(delay, result);
    }

    /// Queue a resend answer
    pub fn respond_resend_otp(&self, result: Result<Acknowledgement, ApiError>) {
        self.resend_otp.push(Duration::ZERO, result);
    }

    /// Queue a logout answer
    pub fn respond_logout(&self, result: Result<(), ApiError>) {
        self.logout.push(Duration::ZERO, result);
    }

    /// Calls received so far
    #[must_use]
    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.snapshot()
    }
}

impl AuthApi for MockAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Acknowledgement, ApiError> {
        self.calls.record(AuthCall::Login(credentials.clone()));
        self.login.next("login").await
    }

    async fn verify_otp(&self, otp: &OtpData) -> Result<OtpResponse, ApiError> {
        self.calls.record(AuthCall::VerifyOtp(otp.clone()));
        self.verify_otp.next("verify_otp").await
    }

    async fn resend_otp(&self, payload: &ResendOtpPayload) -> Result<Acknowledgement, ApiError> {
        self.calls.record(AuthCall::ResendOtp(payload.email.clone()));
        self.resend_otp.next("resend_otp").await
    }

    async fn logout(&self, token: &LogoutToken) -> Result<(), ApiError> {
        self.calls.record(AuthCall::Logout(token.refresh_token.clone()));
        self.logout.next("logout").await
    }
}
