//! Shared-key credentials for Azure Communication Services.
//!
//! The service authenticates requests with an HMAC over a canonical string,
//! keyed by the resource's access key. The key is handed out base64-encoded
//! (the `accesskey=` part of a connection string) and must be decoded before
//! it can be used.
//!
//! # Example
//!
//! ```
//! use integrations_azure_email::credentials::AccessKeyCredential;
//!
//! let credential = AccessKeyCredential::new("c2VjcmV0LWtleQ==");
//! let key = credential.decode_key().unwrap();
//! assert_eq!(&key[..], b"secret-key");
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use zeroize::Zeroizing;

pub mod error;

pub use error::CredentialError;

/// An access key credential.
///
/// The encoded key is held in a [`SecretString`] so it never shows up in
/// `Debug` output, and decoded key bytes are wiped when dropped.
#[derive(Clone)]
pub struct AccessKeyCredential {
    key: SecretString,
}

impl AccessKeyCredential {
    /// Create a credential from the base64-encoded access key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::new(key.into()),
        }
    }

    /// Decode the access key into raw HMAC key bytes.
    ///
    /// Decoding happens per signing operation, so a malformed key fails the
    /// send that tries to use it rather than client construction.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Missing`] for an empty key and
    /// [`CredentialError::Invalid`] when the key is not valid base64.
    pub fn decode_key(&self) -> Result<Zeroizing<Vec<u8>>, CredentialError> {
        let encoded = self.key.expose_secret().trim();
        if encoded.is_empty() {
            return Err(CredentialError::Missing {
                message: "access key is empty".to_string(),
            });
        }

        STANDARD
            .decode(encoded)
            .map(Zeroizing::new)
            .map_err(|e| CredentialError::Invalid {
                message: format!("access key is not valid base64: {}", e),
            })
    }
}

impl From<&str> for AccessKeyCredential {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AccessKeyCredential {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl fmt::Debug for AccessKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyCredential")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
