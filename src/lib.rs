//! Azure Communication Services Email Integration Module
//!
//! Type-safe client for the Azure Communication Services `emails:send` API.
//!
//! # Features
//!
//! - **HMAC-SHA256 Signing**: Shared-key request signing with an injectable clock
//! - **Structured Errors**: Service errors keep their full nested detail
//! - **Batch Sending**: Sequential or bounded-concurrency sends with cancellation
//! - **Async/Await**: Built on Tokio, with a pluggable HTTP transport
//! - **Configuration**: Builder, connection string or environment variables
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_azure_email::{EmailClient, MailBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads AZURE_EMAIL_CONNECTION_STRING and AZURE_EMAIL_SENDER
//!     let client = EmailClient::from_env()?;
//!
//!     let mail = MailBuilder::new()
//!         .to("recipient@example.com")
//!         .subject("Hello from Azure")
//!         .text("This is a test email.")
//!         .build()?;
//!
//!     let id = client.send_mail(&mail).await?;
//!     println!("Message queued! ID: {}", id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **types**: caller-facing [`Mail`], the [`MailMessage`] wire payload, response envelopes
//! - **signing**: content hash, string to sign and `Authorization` header
//! - **services**: the dispatcher that ties signing, transport and response mapping together
//! - **http**: transport abstraction with a reqwest implementation
//! - **error**: [`EmailError`], [`BatchError`] and response reconciliation
//!
//! # Batch Sending
//!
//! ```rust,no_run
//! use integrations_azure_email::{EmailClient, Mail};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(client: EmailClient, mails: Vec<Mail>) {
//! let cancel = CancellationToken::new();
//! if let Err(batch) = client.send_mails_concurrent(&mails, &cancel).await {
//!     for failure in &batch {
//!         eprintln!("mail {} failed: {}", failure.index, failure.error);
//!     }
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// Module declarations
pub mod builders;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod mocks;
pub mod services;
pub mod signing;
pub mod types;

// Re-export main client types
pub use client::{EmailClient, EmailClientBuilder};

// Re-export configuration types
pub use config::{ConfigError, EmailConfig, EmailConfigBuilder};

// Re-export credential types
pub use credentials::{AccessKeyCredential, CredentialError};

// Re-export error types
pub use error::{BatchError, BatchFailure, EmailError, EmailResult, ErrorKind};

// Re-export HTTP types
pub use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

// Re-export service types
pub use services::EmailService;

// Re-export signing types
pub use signing::{Clock, FixedClock, SigningError, SystemClock};

// Re-export common request types
pub use types::{
    Attachment, EmailAddress, EmailContent, ErrorDetail, Mail, MailMessage, Recipients,
    SendMailResponse,
};

// Re-export builder types
pub use builders::{BuilderError, MailBuilder};
