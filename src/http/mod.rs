//! HTTP plumbing for the email endpoint.
//!
//! ```text
//! ┌─────────────────┐
//! │  EmailService   │  - builds and signs HttpRequest
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  HttpTransport  │  - pluggable transport (reqwest, mock)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   reqwest       │  - actual HTTP implementation
//! └─────────────────┘
//! ```

mod request;
mod response;
mod transport;

pub use request::HttpRequest;
pub use response::{HttpResponse, REQUEST_ID_HEADER};
pub use transport::{HttpTransport, ReqwestTransport, ReqwestTransportBuilder};
