//! Error types for the REST gateway

use thiserror::Error;

/// Message used when the server rejects a request without saying why
pub const GENERIC_SERVER_ERROR: &str = "An error occurred";

/// Normalized failure of a gateway call
///
/// The `Display` text is what ends up in a `*Failure` action, so the
/// transport variants deliberately hide their detail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or [`GENERIC_SERVER_ERROR`]
        message: String,
    },

    /// The request was sent but nothing usable came back
    #[error("No response received from server")]
    NoResponse {
        /// Underlying transport error
        detail: String,
    },

    /// The request could not be built
    #[error("Error setting up request")]
    RequestSetup {
        /// Underlying builder or serialization error
        detail: String,
    },

    /// A 2xx response whose body did not match the expected shape
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a server rejection
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credential
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }
}

/// Errors from credential storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the cookie file failed
    #[error("Cookie storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be converted to or from JSON
    #[error("Cookie serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_only_the_message() {
        let error = ApiError::Server {
            status: 400,
            message: "Invalid OTP".to_string(),
        };

        assert_eq!(error.to_string(), "Invalid OTP");
        assert_eq!(error.status(), Some(400));
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn transport_errors_hide_their_detail() {
        let no_response = ApiError::NoResponse {
            detail: "connection refused".to_string(),
        };
        let setup = ApiError::RequestSetup {
            detail: "relative URL without a base".to_string(),
        };

        assert_eq!(no_response.to_string(), "No response received from server");
        assert_eq!(setup.to_string(), "Error setting up request");
        assert_eq!(no_response.status(), None);
    }
}
