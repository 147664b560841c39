//! Service adapters for the email endpoint.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │         EmailClient          │
//! └──────────────┬───────────────┘
//!                ▼
//! ┌──────────────────────────────┐
//! │  EmailService (this module)  │  Mail -> MailMessage -> signed request
//! └──────────────┬───────────────┘
//!                ▼
//! ┌──────────────────────────────┐
//! │        HttpTransport         │
//! └──────────────────────────────┘
//! ```

pub mod emails;

pub use emails::EmailService;
