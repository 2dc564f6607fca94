//! Console configuration.
//!
//! Values come from the environment (optionally seeded from a `.env` file by
//! the binary). Everything except the API base URL has a default.

use admin_console_api::CoordinatorPersistence;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Base URL of the super-admin API, e.g. `https://api.example.com/v1`
pub const ENV_API_URL: &str = "ADMIN_CONSOLE_API_URL";
/// Location of the cookie jar file
pub const ENV_COOKIE_PATH: &str = "ADMIN_CONSOLE_COOKIE_PATH";
/// `preserve-session` or `reset-authentication`
pub const ENV_OTP_FAILURE_POLICY: &str = "ADMIN_CONSOLE_OTP_FAILURE_POLICY";
/// `module-upload` or `role-json`
pub const ENV_COORDINATOR_MODE: &str = "ADMIN_CONSOLE_COORDINATOR_MODE";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable has a value outside its accepted set
    #[error("Invalid value {value:?} for {var}: expected one of {expected}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// Accepted values
        expected: &'static str,
    },

    /// The API base URL is not an absolute http(s) URL
    #[error("API base URL must start with http:// or https://, got {0:?}")]
    InvalidApiUrl(String),
}

/// What a failed OTP verification does to an existing session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpFailurePolicy {
    /// Record the error and leave `is_authenticated` as it was
    #[default]
    PreserveSession,
    /// Record the error and mark the session unauthenticated
    ResetAuthentication,
}

impl FromStr for OtpFailurePolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preserve-session" => Ok(Self::PreserveSession),
            "reset-authentication" => Ok(Self::ResetAuthentication),
            _ => Err(ConfigError::Invalid {
                var: ENV_OTP_FAILURE_POLICY,
                value: value.to_string(),
                expected: "preserve-session, reset-authentication",
            }),
        }
    }
}

fn parse_persistence(value: &str) -> Result<CoordinatorPersistence, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "module-upload" => Ok(CoordinatorPersistence::ModuleUpload),
        "role-json" => Ok(CoordinatorPersistence::RoleJson),
        _ => Err(ConfigError::Invalid {
            var: ENV_COORDINATOR_MODE,
            value: value.to_string(),
            expected: "module-upload, role-json",
        }),
    }
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the super-admin API.
    pub api_base_url: String,

    /// Cookie jar file.
    ///
    /// Default: `$HOME/.admin-console/cookies.json`
    pub cookie_path: PathBuf,

    /// Behaviour of `VerifyOtpFailure`.
    ///
    /// Default: [`OtpFailurePolicy::PreserveSession`]
    pub otp_failure_policy: OtpFailurePolicy,

    /// Endpoint used to save coordinator toggles.
    ///
    /// Default: [`CoordinatorPersistence::ModuleUpload`]
    pub coordinator_persistence: CoordinatorPersistence,
}

impl ConsoleConfig {
    /// Create a configuration for `api_base_url` with defaults elsewhere.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            cookie_path: default_cookie_path(),
            otp_failure_policy: OtpFailurePolicy::default(),
            coordinator_persistence: CoordinatorPersistence::default(),
        }
    }

    /// Load from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API URL is missing or any value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API URL is missing or any value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup(ENV_API_URL).ok_or(ConfigError::Missing(ENV_API_URL))?;
        let mut config = Self::new(api_base_url);

        if let Some(path) = lookup(ENV_COOKIE_PATH) {
            config = config.with_cookie_path(path);
        }
        if let Some(policy) = lookup(ENV_OTP_FAILURE_POLICY) {
            config = config.with_otp_failure_policy(policy.parse()?);
        }
        if let Some(mode) = lookup(ENV_COORDINATOR_MODE) {
            config = config.with_coordinator_persistence(parse_persistence(&mode)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the cookie jar file.
    #[must_use]
    pub fn with_cookie_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_path = path.into();
        self
    }

    /// Set the OTP failure policy.
    #[must_use]
    pub const fn with_otp_failure_policy(mut self, policy: OtpFailurePolicy) -> Self {
        self.otp_failure_policy = policy;
        self
    }

    /// Set how coordinator toggles are saved.
    #[must_use]
    pub const fn with_coordinator_persistence(mut self, persistence: CoordinatorPersistence) -> Self {
        self.coordinator_persistence = persistence;
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] for a non-http(s) base URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        let has_host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());

        if has_host {
            Ok(())
        } else {
            Err(ConfigError::InvalidApiUrl(self.api_base_url.clone()))
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000/v1")
    }
}

fn default_cookie_path() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".admin-console")
        .join("cookies.json")
}
