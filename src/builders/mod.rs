//! Builders for constructing mails with a fluent API.
//!
//! # Examples
//!
//! ```rust
//! use integrations_azure_email::builders::MailBuilder;
//!
//! let mail = MailBuilder::new()
//!     .to("recipient@example.com")
//!     .subject("Quarterly report")
//!     .text("See attached.")
//!     .attachment_guess("report.csv", b"a,b\n1,2\n")
//!     .build()?;
//!
//! assert_eq!(mail.attachments[0].content_type, "text/csv");
//! # Ok::<(), integrations_azure_email::builders::BuilderError>(())
//! ```

mod mail_builder;

pub use mail_builder::MailBuilder;

use thiserror::Error;

/// Why a [`MailBuilder`] refused to build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// No "To" recipient was added.
    #[error("Mail needs at least one \"to\" recipient")]
    NoRecipients,

    /// No subject was set.
    #[error("Mail needs a subject")]
    MissingSubject,

    /// Neither a plain text nor an HTML body was set.
    #[error("Mail needs a plain text or HTML body")]
    MissingBody,

    /// An address does not look like `local@domain`.
    #[error("Invalid {field} address '{address}'")]
    InvalidAddress {
        /// Which list the address was added to (`to`, `cc`, `bcc`, `reply_to`).
        field: &'static str,
        /// The rejected address.
        address: String,
    },

    /// An attachment has a blank file name.
    #[error("Attachment {index} has no name")]
    UnnamedAttachment {
        /// Position of the attachment in the mail.
        index: usize,
    },
}
