//! Authentication actions.

use admin_console_api::types::{OtpData, OtpResponse};

/// Authentication actions.
///
/// Each flow has a `*Request` intent dispatched by the UI and exactly one
/// `*Success` or `*Failure` action produced by its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Login
    // ═══════════════════════════════════════════════════════════════════════
    /// Submit credentials
    LoginRequest {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// Credentials accepted and a passcode was sent
    LoginSuccess {
        /// Server message, e.g. "OTP sent"
        message: String,
    },

    /// Credentials rejected
    LoginFailure {
        /// Error message
        error: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // OTP verification
    // ═══════════════════════════════════════════════════════════════════════
    /// Submit the passcode
    VerifyOtpRequest(OtpData),

    /// Passcode accepted
    VerifyOtpSuccess(OtpResponse),

    /// Passcode rejected
    VerifyOtpFailure {
        /// Error message
        error: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // OTP resend
    // ═══════════════════════════════════════════════════════════════════════
    /// Ask for a new passcode
    ResendOtpRequest {
        /// Email to send it to
        email: String,
    },

    /// Resend answered
    ResendOtpSuccess {
        /// Whether the server sent a passcode
        success: bool,
        /// Server message
        message: String,
    },

    /// Resend failed
    ResendOtpFailure {
        /// Error message
        error: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Logout
    // ═══════════════════════════════════════════════════════════════════════
    /// End the session
    LogoutRequest {
        /// Token to revoke; defaults to the session's refresh token
        refresh_token: Option<String>,
    },

    /// Session cleared
    LogoutSuccess,

    /// Logout crashed before the session could be cleared
    LogoutFailure {
        /// Error message
        error: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Housekeeping
    // ═══════════════════════════════════════════════════════════════════════
    /// Dismiss the login message and error
    ClearAuthMessages,
}
