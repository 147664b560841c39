//! HMAC-SHA256 request signing for Azure Communication Services.
//!
//! Every request to the email endpoint carries three headers the service
//! recomputes and compares:
//!
//! - `x-ms-date` - the request time as an HTTP-date
//! - `x-ms-content-sha256` - base64 SHA-256 of the exact body bytes
//! - `Authorization` - `HMAC-SHA256 SignedHeaders=...&Signature=...`
//!
//! The signature is an HMAC keyed by the decoded access key over
//! `METHOD\npath?query\ndate;host;content-hash`.
//!
//! # Components
//!
//! - **shared_key** - Content hashing, string-to-sign and signature functions
//! - **clock** - Injectable time source so signatures can be reproduced in tests
//! - **error** - Error types for signing operations
//!
//! # Quick Start
//!
//! ```
//! use integrations_azure_email::credentials::AccessKeyCredential;
//! use integrations_azure_email::signing::{sign_request, Clock, SystemClock};
//!
//! let credential = AccessKeyCredential::new("c2VjcmV0");
//! let signed = sign_request(
//!     "POST",
//!     "/emails:send?api-version=2023-03-31",
//!     "contoso.communication.azure.com",
//!     b"{}",
//!     &SystemClock.now(),
//!     &credential,
//! )
//! .unwrap();
//!
//! assert!(signed.authorization.contains("Signature="));
//! ```
//!
//! # Security Considerations
//!
//! - Never log the access key; [`AccessKeyCredential`](crate::credentials::AccessKeyCredential) redacts it in `Debug`
//! - Decoded key bytes are zeroized after each signature
//! - The service rejects requests whose `x-ms-date` is too far from its own clock

mod clock;
mod error;
mod shared_key;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::SigningError;
pub use shared_key::{
    compute_signature, content_hash, format_http_date, sign_request, string_to_sign,
    SignedHeaders, AUTHORIZATION_HEADER, CONTENT_HASH_HEADER, DATE_HEADER, HMAC_SCHEME,
    SIGNED_HEADERS,
};
