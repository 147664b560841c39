//! Signing error types for Azure Communication Services.

use crate::credentials::CredentialError;
use thiserror::Error;

/// Errors that can occur while signing a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The access key could not be turned into HMAC key material.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_azure_email::credentials::CredentialError;
    /// use integrations_azure_email::signing::SigningError;
    ///
    /// let error = SigningError::from(CredentialError::Invalid {
    ///     message: "bad padding".to_string(),
    /// });
    /// assert_eq!(error.to_string(), "Invalid signing key: Invalid credentials: bad padding");
    /// ```
    #[error("Invalid signing key: {0}")]
    InvalidKey(#[from] CredentialError),

    /// The host used in the canonical string was empty.
    #[error("Missing required header: {header}")]
    MissingHeader {
        /// The name of the missing header.
        header: String,
    },

    /// The path and query did not start with `/`.
    #[error("Invalid path: {message}")]
    InvalidPath {
        /// Details about what makes the path invalid.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_error() {
        let error = SigningError::MissingHeader {
            header: "host".to_string(),
        };
        assert_eq!(error.to_string(), "Missing required header: host");
    }

    #[test]
    fn test_invalid_path_error() {
        let error = SigningError::InvalidPath {
            message: "path must start with '/'".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid path: path must start with '/'");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SigningError>();
    }
}
