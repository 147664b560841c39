//! Credential error types for Azure Communication Services.

use thiserror::Error;

/// Errors that can occur while preparing key material for signing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The access key is empty.
    #[error("Missing credentials: {message}")]
    Missing {
        /// Details about which credential is missing.
        message: String,
    },

    /// The access key is not valid base64 and cannot be used as an HMAC key.
    #[error("Invalid credentials: {message}")]
    Invalid {
        /// Details about why the key could not be decoded.
        message: String,
    },
}
