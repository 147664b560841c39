//! The payload shape sent to the email endpoint.

use serde::Serialize;

use super::email::{Attachment, EmailAddress, EmailContent, Mail, Recipients};

/// Wire payload for `POST /emails:send`.
///
/// Borrows everything from the [`Mail`] it was built from, so building one
/// costs nothing beyond the struct itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage<'a> {
    /// Sender address taken from the client configuration.
    pub sender_address: &'a str,
    /// Subject and bodies.
    pub content: &'a EmailContent,
    /// Recipients.
    pub recipients: &'a Recipients,
    /// Attachments.
    #[serde(skip_serializing_if = "is_empty")]
    pub attachments: &'a [Attachment],
    /// Reply-to addresses.
    #[serde(skip_serializing_if = "is_empty")]
    pub reply_to: &'a [EmailAddress],
    /// Always `true`; open and click tracking is never requested.
    pub user_engagement_tracking_disabled: bool,
}

impl<'a> MailMessage<'a> {
    /// Map a mail onto the wire payload.
    ///
    /// Recipients, content, attachments and reply-to are copied verbatim,
    /// the sender is replaced with `sender_address`, and engagement tracking
    /// is disabled unconditionally.
    ///
    /// ```
    /// use integrations_azure_email::types::{EmailContent, Mail, MailMessage, Recipients};
    ///
    /// let mail = Mail::new(
    ///     Recipients::new().add_to("user@example.com"),
    ///     EmailContent::new("Hello").with_text("Hi there"),
    /// );
    /// let message = MailMessage::from_mail(&mail, "noreply@contoso.com");
    ///
    /// assert_eq!(message.sender_address, "noreply@contoso.com");
    /// assert!(message.user_engagement_tracking_disabled);
    /// ```
    pub fn from_mail(mail: &'a Mail, sender_address: &'a str) -> Self {
        Self {
            sender_address,
            content: &mail.content,
            recipients: &mail.recipients,
            attachments: &mail.attachments,
            reply_to: &mail.reply_to,
            user_engagement_tracking_disabled: true,
        }
    }
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}
