//! Authentication state.

use admin_console_api::storage::keys;
use admin_console_api::types::{OtpResponse, Token, User};
use admin_console_api::{CredentialStorage, CredentialStorageExt};
use serde::{Deserialize, Serialize};

/// Authentication state.
///
/// `loading` tracks login, OTP verification and logout; `is_loading` only
/// tracks the OTP resend sub-flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Signed-in user.
    pub user: Option<User>,

    /// Session credential.
    pub token: Option<Token>,

    /// Login, verification or logout in flight.
    pub loading: bool,

    /// Last error of the primary flow.
    pub error: Option<String>,

    /// Set only by a successful OTP verification.
    pub is_authenticated: bool,

    /// Full envelope of the last OTP verification.
    pub otp_response: Option<OtpResponse>,

    /// Server message after credentials were accepted.
    pub login_message: String,

    /// Credentials accepted and a passcode was sent.
    pub otp_sent: bool,

    /// Outcome of the last resend.
    pub success: bool,

    /// Message of the last resend.
    pub message: String,

    /// Resend in flight.
    pub is_loading: bool,
}

impl AuthState {
    /// Initial state seeded from the session cookies
    ///
    /// A restored token is the opaque string stored at verification time.
    /// Restoring does not mark the session authenticated; only a fresh OTP
    /// verification does.
    #[must_use]
    pub fn hydrate<S: CredentialStorage + ?Sized>(storage: &S) -> Self {
        Self {
            user: storage.get_json(keys::USER),
            token: storage.get(keys::TOKEN).map(Token::Opaque),
            ..Self::default()
        }
    }

    /// Refresh token to revoke on logout, if one is known
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.token.as_ref().map(Token::refresh_token)
    }
}
