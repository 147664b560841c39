//! Mail dispatch for the `emails:send` operation.
//!
//! A single send runs through a fixed pipeline:
//!
//! 1. Map the [`Mail`] onto a [`MailMessage`] with the configured sender
//! 2. Serialize it to JSON
//! 3. Sign the exact body bytes and attach the signed headers
//! 4. Submit through the transport, bounded by the configured timeout
//! 5. Reconcile the response into a message id or an [`EmailError`]
//!
//! Nothing is retried. Batch sends attempt every mail and report all
//! failures together in a [`BatchError`].

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http::Method;
use tokio_util::sync::CancellationToken;

use crate::config::EmailConfig;
use crate::error::{map_send_response, BatchError, BatchFailure, EmailError, EmailResult};
use crate::http::{HttpRequest, HttpTransport};
use crate::signing::{sign_request, Clock};
use crate::types::{Mail, MailMessage};

/// Service for email sending operations.
///
/// Holds only read-only shared state, so one service can serve any number
/// of concurrent sends.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use integrations_azure_email::config::EmailConfig;
/// use integrations_azure_email::mocks::{MockResponse, MockTransport};
/// use integrations_azure_email::services::EmailService;
/// use integrations_azure_email::signing::SystemClock;
/// use integrations_azure_email::types::{EmailContent, Mail, Recipients};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EmailConfig::builder()
///     .endpoint("https://contoso.communication.azure.com")
///     .access_key("c2VjcmV0")
///     .sender("DoNotReply@contoso.com")
///     .build()?;
/// let transport = MockTransport::with_default(MockResponse::accepted("abc123"));
/// let service = EmailService::new(Arc::new(config), Arc::new(transport), Arc::new(SystemClock));
///
/// let mail = Mail::new(
///     Recipients::new().add_to("user@example.com"),
///     EmailContent::new("Hello").with_text("Hi"),
/// );
/// assert_eq!(service.send_mail(&mail).await?, "abc123");
/// # Ok(())
/// # }
/// ```
pub struct EmailService {
    config: Arc<EmailConfig>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
}

impl EmailService {
    /// Create a new email service.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, sender, credential and timeouts
    /// * `transport` - Transport used for every request
    /// * `clock` - Source of the signing timestamp
    pub fn new(
        config: Arc<EmailConfig>,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            transport,
            clock,
        }
    }

    /// The configuration this service sends with.
    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// Build the signed request for a mail without sending it.
    ///
    /// # Errors
    ///
    /// - [`EmailError::Serialization`] if the payload cannot be encoded
    /// - [`EmailError::Credential`] if the access key cannot be decoded
    /// - [`EmailError::Configuration`] if the endpoint yields an unusable host or path
    pub fn build_request(&self, mail: &Mail) -> EmailResult<HttpRequest> {
        let message = MailMessage::from_mail(mail, &self.config.sender_address);
        let body = serde_json::to_vec(&message).map_err(|e| EmailError::Serialization {
            message: e.to_string(),
        })?;

        let path = self.config.send_path();
        let host = self.config.host();
        let signed = sign_request(
            Method::POST.as_str(),
            &path,
            &host,
            &body,
            &self.clock.now(),
            &self.config.credential,
        )?;

        let mut request = HttpRequest::new(Method::POST.as_str(), self.config.send_url())
            .with_header(CONTENT_TYPE.as_str(), "application/json")
            .with_header(HOST.as_str(), host)
            .with_body(body);
        signed.apply(&mut request.headers);

        if let Some(user_agent) = &self.config.user_agent {
            request = request.with_header(USER_AGENT.as_str(), user_agent.as_str());
        }

        Ok(request)
    }

    /// Send one mail and return the service-assigned message id.
    ///
    /// # Errors
    ///
    /// Any [`EmailError`]. Credential and serialization failures happen
    /// before the transport is called.
    pub async fn send_mail(&self, mail: &Mail) -> EmailResult<String> {
        let request = self.build_request(mail)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            url = %request.url,
            recipients = mail.recipients.recipient_count(),
            attachments = mail.attachments.len(),
            "Sending mail"
        );

        let timeout = self.config.timeout;
        let response = tokio::time::timeout(timeout, self.transport.send(request))
            .await
            .map_err(|_| EmailError::Timeout {
                message: format!("no response within {:?}", timeout),
            })??;

        let result = map_send_response(response.status, &response.body, response.request_id());

        #[cfg(feature = "tracing")]
        match &result {
            Ok(id) => tracing::debug!(status = response.status, id = %id, "Mail accepted"),
            Err(e) => tracing::debug!(
                status = response.status,
                request_id = ?response.request_id(),
                error = %e,
                "Mail rejected"
            ),
        }

        result
    }

    /// Send mails one after another.
    ///
    /// Every mail is attempted even if earlier ones fail. An empty slice
    /// succeeds without touching the transport.
    ///
    /// # Errors
    ///
    /// A [`BatchError`] listing each failed mail by index.
    pub async fn send_mails(&self, mails: &[Mail]) -> Result<(), BatchError> {
        let mut failures = Vec::new();

        for (index, mail) in mails.iter().enumerate() {
            if let Err(error) = self.send_mail(mail).await {
                log_failure(index, &error);
                failures.push(BatchFailure { index, error });
            }
        }

        BatchError::from_failures(failures).into_result()
    }

    /// Send mails with up to `max_concurrency` requests in flight.
    ///
    /// Once `cancel` fires no new sends start: each mail not yet started is
    /// recorded as [`EmailError::Cancelled`] while in-flight sends run to
    /// completion.
    ///
    /// # Errors
    ///
    /// A [`BatchError`] listing each failed or cancelled mail by index, with
    /// [`BatchError::is_cancelled`] set when any mail was skipped.
    pub async fn send_mails_concurrent(
        &self,
        mails: &[Mail],
        cancel: &CancellationToken,
    ) -> Result<(), BatchError> {
        let limit = self.config.max_concurrency.max(1);

        let outcomes: Vec<(usize, EmailResult<String>)> = stream::iter(mails.iter().enumerate())
            .map(|(index, mail)| async move {
                if cancel.is_cancelled() {
                    return (index, Err(EmailError::Cancelled));
                }
                (index, self.send_mail(mail).await)
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut cancelled = false;
        let failures: Vec<BatchFailure> = outcomes
            .into_iter()
            .filter_map(|(index, outcome)| outcome.err().map(|error| (index, error)))
            .map(|(index, error)| {
                if matches!(error, EmailError::Cancelled) {
                    cancelled = true;
                } else {
                    log_failure(index, &error);
                }
                BatchFailure { index, error }
            })
            .collect();

        #[cfg(feature = "tracing")]
        if cancelled {
            tracing::warn!(total = mails.len(), "Batch cancelled before all mails were sent");
        }

        BatchError::from_failures(failures)
            .with_cancelled(cancelled)
            .into_result()
    }
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_failure(index: usize, error: &EmailError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(index, kind = ?error.kind(), error = %error, "Mail in batch failed");
}
