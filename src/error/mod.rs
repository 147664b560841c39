//! Error types for the Azure Communication Services Email integration.
//!
//! Errors are categorized by their source so callers can decide what to do
//! without matching on message text:
//!
//! - Credential errors (access key cannot be decoded) abort a send before any network call
//! - Transport errors (connection failures, timeouts) may be retried by the caller
//! - API errors carry the full structured error returned by the service
//! - Decode errors mean the response body was not the expected JSON
//!
//! Batch sends collect per-mail failures in a [`BatchError`].
//!
//! # Examples
//!
//! ```rust
//! use integrations_azure_email::error::{EmailError, ErrorKind};
//!
//! fn handle(error: &EmailError) {
//!     match error.kind() {
//!         ErrorKind::Api => println!("service said: {} ({:?})", error, error.error_code()),
//!         ErrorKind::Transport if error.is_retryable() => println!("try again later"),
//!         _ => println!("giving up: {}", error),
//!     }
//! }
//! ```

mod batch;
mod mapping;

pub use batch::{BatchError, BatchFailure};
pub use mapping::{map_send_response, parse_error_response, parse_success_response};

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::signing::SigningError;
use crate::types::ErrorDetail;
use thiserror::Error;

/// Result type alias for email operations.
pub type EmailResult<T> = Result<T, EmailError>;

/// Coarse classification of an [`EmailError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Key material could not be used for signing.
    Credential,
    /// The request never produced a response (network failure or timeout).
    Transport,
    /// The service answered with a non-202 status.
    Api,
    /// The response body could not be parsed.
    Decode,
    /// The request body could not be encoded.
    Serialization,
    /// The client is misconfigured.
    Configuration,
    /// A batch was cancelled before this send started.
    Cancelled,
}

/// Top-level error type for the email client.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Configuration-related errors.
    ///
    /// These errors occur when the endpoint or header material cannot be
    /// turned into a valid request.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// The access key is malformed or missing.
    #[error("Credential error: {source}")]
    Credential {
        /// Underlying credential error.
        #[from]
        source: CredentialError,
    },

    /// Network errors.
    ///
    /// The transport failed before a response was received. The original
    /// error is kept as the source.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// The service rejected the request.
    ///
    /// Displays as the top-level message only; nested `details` and
    /// `additionalInfo` stay available through [`EmailError::detail`].
    #[error("{}", .error.message)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Structured error from the response body.
        error: ErrorDetail,
        /// Value of the `x-ms-request-id` response header.
        request_id: Option<String>,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("Failed to decode response with status {status}: {source}")]
    Decode {
        /// HTTP status code of the undecodable response.
        status: u16,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// A batch was cancelled before this mail was sent.
    #[error("Send cancelled before it started")]
    Cancelled,
}

impl EmailError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EmailError::Configuration { .. } => ErrorKind::Configuration,
            EmailError::Credential { .. } => ErrorKind::Credential,
            EmailError::Transport { .. } | EmailError::Timeout { .. } => ErrorKind::Transport,
            EmailError::Api { .. } => ErrorKind::Api,
            EmailError::Decode { .. } => ErrorKind::Decode,
            EmailError::Serialization { .. } => ErrorKind::Serialization,
            EmailError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Returns true if the error is retryable.
    ///
    /// Retryable errors include transport failures, timeouts, throttling
    /// (429) and server-side (5xx) API errors. The client never retries on
    /// its own; this is a hint for callers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_azure_email::error::EmailError;
    ///
    /// let error = EmailError::Timeout {
    ///     message: "request exceeded 30s".to_string(),
    /// };
    ///
    /// assert!(error.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            EmailError::Transport { .. } | EmailError::Timeout { .. } => true,
            EmailError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the service error code if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            EmailError::Api { error, .. } if !error.code.is_empty() => Some(error.code.as_str()),
            _ => None,
        }
    }

    /// Returns the HTTP status for errors that came with a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            EmailError::Api { status, .. } | EmailError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the full structured service error, including nested details.
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            EmailError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns the request ID reported by the service, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            EmailError::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}

impl From<SigningError> for EmailError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::InvalidKey(source) => EmailError::Credential { source },
            other => EmailError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmailError::Timeout {
                message: err.to_string(),
            }
        } else {
            EmailError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}
