//! Input checks run before an action is dispatched.
//!
//! Invalid input never reaches a store; callers show the per-field messages
//! instead.

use admin_console_api::types::{LoginCredentials, OtpData};
use std::collections::BTreeMap;
use std::fmt;

/// Minimum password length accepted by the login form
pub const MIN_PASSWORD_LEN: usize = 6;
/// Number of digits in a one-time passcode
pub const OTP_LEN: usize = 6;

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: &str) {
        self.fields.entry(field).or_insert_with(|| message.to_string());
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.fields.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Message for one field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// All `(field, message)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// `local@domain.tld` with a two-letter-or-longer alphabetic TLD
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    local_ok && host_ok && tld_ok
}

/// Check login form input
///
/// # Errors
///
/// Returns messages for `email` and/or `password`.
pub fn validate_login(email: &str, password: &str) -> Result<LoginCredentials, ValidationErrors> {
    let email = email.trim();
    let mut errors = ValidationErrors::default();

    if !is_email(email) {
        errors.add("email", "Invalid email address");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Password must be at least 6 characters long");
    }

    errors.into_result(LoginCredentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Check OTP form input
///
/// # Errors
///
/// Returns messages for `email` and/or `otp`.
pub fn validate_otp(email: &str, otp: &str) -> Result<OtpData, ValidationErrors> {
    let email = email.trim();
    let otp = otp.trim();
    let mut errors = ValidationErrors::default();

    if !is_email(email) {
        errors.add("email", "Invalid email address");
    }
    if otp.len() != OTP_LEN || !otp.chars().all(|c| c.is_ascii_digit()) {
        errors.add("otp", "OTP must be 6 digits");
    }

    errors.into_result(OtpData {
        email: email.to_string(),
        otp: otp.to_string(),
    })
}
