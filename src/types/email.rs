//! Mail description types supplied by callers.

use serde::{Deserialize, Serialize};

/// Represents an email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    /// Email address (e.g., "user@example.com").
    pub address: String,
    /// Display name (e.g., "John Doe").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl EmailAddress {
    /// Create a new email address without a display name.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: None,
        }
    }

    /// Create a new email address with a display name.
    pub fn with_name(address: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: Some(display_name.into()),
        }
    }
}

impl From<String> for EmailAddress {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

impl From<&str> for EmailAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// Mail recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipients {
    /// "To" recipients.
    #[serde(default)]
    pub to: Vec<EmailAddress>,
    /// "CC" recipients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<EmailAddress>,
    /// "BCC" recipients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<EmailAddress>,
}

impl Recipients {
    /// Create an empty recipient set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a "To" recipient.
    pub fn add_to(mut self, address: impl Into<EmailAddress>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add a "CC" recipient.
    pub fn add_cc(mut self, address: impl Into<EmailAddress>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a "BCC" recipient.
    pub fn add_bcc(mut self, address: impl Into<EmailAddress>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Get total number of recipients.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

/// Subject and bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContent {
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    /// HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl EmailContent {
    /// Create content with a subject and no body.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            plain_text: None,
            html: None,
        }
    }

    /// Set the plain text body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.plain_text = Some(text.into());
        self
    }

    /// Set the HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// A file attached to the mail, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// File name shown to the recipient.
    pub name: String,
    /// MIME type (e.g., "application/pdf").
    pub content_type: String,
    /// Base64-encoded file contents.
    pub content_in_base64: String,
}

impl Attachment {
    /// Create an attachment from an already encoded payload.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        content_in_base64: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            content_in_base64: content_in_base64.into(),
        }
    }
}

/// Everything a caller says about one mail.
///
/// The sender address is not part of a `Mail`; it comes from the client
/// configuration when the mail is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mail {
    /// Recipients.
    pub recipients: Recipients,
    /// Subject and bodies.
    pub content: EmailContent,
    /// Attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Reply-to addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reply_to: Vec<EmailAddress>,
}

impl Mail {
    /// Create a mail from recipients and content.
    pub fn new(recipients: Recipients, content: EmailContent) -> Self {
        Self {
            recipients,
            content,
            attachments: Vec::new(),
            reply_to: Vec::new(),
        }
    }

    /// Add an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Add a reply-to address.
    pub fn with_reply_to(mut self, address: impl Into<EmailAddress>) -> Self {
        self.reply_to.push(address.into());
        self
    }
}
