//! Fluent construction of [`Mail`] values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::builders::BuilderError;
use crate::types::{Attachment, EmailAddress, EmailContent, Mail, Recipients};

/// Builder for constructing a [`Mail`] with validation.
///
/// The sender is not set here; every mail is sent from the address in the
/// client configuration.
///
/// # Examples
///
/// ```rust
/// use integrations_azure_email::builders::MailBuilder;
/// use integrations_azure_email::types::EmailAddress;
///
/// let mail = MailBuilder::new()
///     .to(EmailAddress::with_name("ann@example.com", "Ann"))
///     .cc("team@example.com")
///     .reply_to("support@contoso.com")
///     .subject("Welcome")
///     .html("<p>Hello Ann</p>")
///     .build()?;
///
/// assert_eq!(mail.recipients.recipient_count(), 2);
/// # Ok::<(), integrations_azure_email::builders::BuilderError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MailBuilder {
    recipients: Recipients,
    reply_to: Vec<EmailAddress>,
    subject: Option<String>,
    text_body: Option<String>,
    html_body: Option<String>,
    attachments: Vec<Attachment>,
}

impl MailBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a "To" recipient.
    pub fn to(mut self, address: impl Into<EmailAddress>) -> Self {
        self.recipients.to.push(address.into());
        self
    }

    /// Add a "CC" recipient.
    pub fn cc(mut self, address: impl Into<EmailAddress>) -> Self {
        self.recipients.cc.push(address.into());
        self
    }

    /// Add a "BCC" recipient.
    pub fn bcc(mut self, address: impl Into<EmailAddress>) -> Self {
        self.recipients.bcc.push(address.into());
        self
    }

    /// Add a reply-to address.
    pub fn reply_to(mut self, address: impl Into<EmailAddress>) -> Self {
        self.reply_to.push(address.into());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the plain text body.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text_body = Some(text.into());
        self
    }

    /// Set the HTML body.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// Attach raw bytes, base64-encoding them.
    pub fn attachment(
        mut self,
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl AsRef<[u8]>,
    ) -> Self {
        self.attachments.push(Attachment::new(
            name,
            content_type,
            STANDARD.encode(data.as_ref()),
        ));
        self
    }

    /// Attach raw bytes, inferring the content type from the file name.
    ///
    /// Unknown extensions fall back to `application/octet-stream`.
    pub fn attachment_guess(self, name: impl Into<String>, data: impl AsRef<[u8]>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        self.attachment(name, content_type, data)
    }

    /// Add an attachment whose content is already base64-encoded.
    pub fn encoded_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Build the mail.
    ///
    /// # Errors
    ///
    /// - `NoRecipients`, `MissingSubject` or `MissingBody` when a required part is absent
    /// - `InvalidAddress` for an address that is not `local@domain`
    /// - `UnnamedAttachment` for an attachment with a blank name
    pub fn build(self) -> Result<Mail, BuilderError> {
        if self.recipients.to.is_empty() {
            return Err(BuilderError::NoRecipients);
        }

        let fields: [(&'static str, &[EmailAddress]); 4] = [
            ("to", &self.recipients.to),
            ("cc", &self.recipients.cc),
            ("bcc", &self.recipients.bcc),
            ("reply_to", &self.reply_to),
        ];
        for (field, addresses) in fields {
            validate_addresses(field, addresses)?;
        }

        let subject = self.subject.ok_or(BuilderError::MissingSubject)?;

        if self.text_body.is_none() && self.html_body.is_none() {
            return Err(BuilderError::MissingBody);
        }

        if let Some(index) = self
            .attachments
            .iter()
            .position(|a| a.name.trim().is_empty())
        {
            return Err(BuilderError::UnnamedAttachment { index });
        }

        let content = EmailContent {
            subject,
            plain_text: self.text_body,
            html: self.html_body,
        };

        Ok(Mail {
            recipients: self.recipients,
            content,
            attachments: self.attachments,
            reply_to: self.reply_to,
        })
    }
}

fn validate_addresses(field: &'static str, addresses: &[EmailAddress]) -> Result<(), BuilderError> {
    match addresses.iter().find(|a| !is_plausible_address(&a.address)) {
        Some(bad) => Err(BuilderError::InvalidAddress {
            field,
            address: bad.address.clone(),
        }),
        None => Ok(()),
    }
}

fn is_plausible_address(address: &str) -> bool {
    match address.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn minimal() -> MailBuilder {
        MailBuilder::new().to("a@example.com").subject("s").text("t")
    }

    #[test]
    fn test_minimal_mail() {
        let mail = minimal().build().unwrap();

        assert_eq!(mail.recipients.to[0].address, "a@example.com");
        assert_eq!(mail.content.subject, "s");
        assert_eq!(mail.content.plain_text.as_deref(), Some("t"));
        assert!(mail.content.html.is_none());
        assert!(mail.attachments.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            MailBuilder::new().subject("s").text("t").build(),
            Err(BuilderError::NoRecipients)
        );
        assert_eq!(
            MailBuilder::new().to("a@example.com").text("t").build(),
            Err(BuilderError::MissingSubject)
        );
        assert_eq!(
            MailBuilder::new().to("a@example.com").subject("s").build(),
            Err(BuilderError::MissingBody)
        );
    }

    #[rstest]
    #[case("plain")]
    #[case("@example.com")]
    #[case("user@")]
    #[case("")]
    fn test_rejects_bad_addresses(#[case] address: &str) {
        let err = minimal().cc(address).build().unwrap_err();
        assert_eq!(
            err,
            BuilderError::InvalidAddress {
                field: "cc",
                address: address.to_string(),
            }
        );
    }

    #[test]
    fn test_attachment_is_base64_encoded() {
        let mail = minimal()
            .attachment("hello.bin", "application/octet-stream", b"hello")
            .build()
            .unwrap();

        assert_eq!(mail.attachments[0].content_in_base64, "aGVsbG8=");
        assert_eq!(mail.attachments[0].content_type, "application/octet-stream");
    }

    #[rstest]
    #[case("report.pdf", "application/pdf")]
    #[case("notes.txt", "text/plain")]
    #[case("logo.png", "image/png")]
    #[case("mystery", "application/octet-stream")]
    fn test_attachment_guess(#[case] name: &str, #[case] expected: &str) {
        let mail = minimal().attachment_guess(name, b"x").build().unwrap();
        assert_eq!(mail.attachments[0].content_type, expected);
    }

    #[test]
    fn test_unnamed_attachment_rejected() {
        let err = minimal()
            .encoded_attachment(Attachment::new(" ", "text/plain", "eA=="))
            .build()
            .unwrap_err();
        assert_eq!(err, BuilderError::UnnamedAttachment { index: 0 });
    }

    #[test]
    fn test_reply_to_kept() {
        let mail = minimal().reply_to("r@example.com").build().unwrap();
        assert_eq!(mail.reply_to, vec![EmailAddress::new("r@example.com")]);
    }
}
