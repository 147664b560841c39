//! Email client implementation.
//!
//! `EmailClient` is the main entry point. It owns the shared configuration,
//! transport and clock, and forwards sends to the [`EmailService`].
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_azure_email::{EmailClient, MailBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = EmailClient::from_env()?;
//!
//! let mail = MailBuilder::new()
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .text("Email body")
//!     .build()?;
//!
//! let id = client.send_mail(&mail).await?;
//! println!("queued as {}", id);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::EmailConfig;
use crate::error::{BatchError, EmailError, EmailResult};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::services::EmailService;
use crate::signing::{Clock, SystemClock};
use crate::types::Mail;

/// Client for the Azure Communication Services email endpoint.
///
/// Cheap to clone; clones share configuration and transport.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use integrations_azure_email::{EmailClient, EmailConfig};
/// use integrations_azure_email::mocks::{MockResponse, MockTransport};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EmailConfig::builder()
///     .endpoint("https://contoso.communication.azure.com")
///     .access_key("c2VjcmV0")
///     .sender("DoNotReply@contoso.com")
///     .build()?;
///
/// let client = EmailClient::builder()
///     .config(config)
///     .transport(Arc::new(MockTransport::with_default(MockResponse::accepted("id"))))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EmailClient {
    service: Arc<EmailService>,
}

impl EmailClient {
    /// Create a client that sends over reqwest.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the HTTP client cannot be initialized.
    pub fn new(config: EmailConfig) -> EmailResult<Self> {
        Self::builder().config(config).build()
    }

    /// Create a client from environment variables.
    ///
    /// See [`EmailConfig::from_env`] for the variables read.
    pub fn from_env() -> EmailResult<Self> {
        Self::new(EmailConfig::from_env()?)
    }

    /// Create a client builder.
    pub fn builder() -> EmailClientBuilder {
        EmailClientBuilder::new()
    }

    /// Get the client configuration.
    pub fn config(&self) -> &EmailConfig {
        self.service.config()
    }

    /// Access the email service.
    pub fn emails(&self) -> &EmailService {
        &self.service
    }

    /// Send one mail and return its message id.
    pub async fn send_mail(&self, mail: &Mail) -> EmailResult<String> {
        self.service.send_mail(mail).await
    }

    /// Send mails sequentially, attempting every one.
    pub async fn send_mails(&self, mails: &[Mail]) -> Result<(), BatchError> {
        self.service.send_mails(mails).await
    }

    /// Send mails with bounded concurrency until done or cancelled.
    pub async fn send_mails_concurrent(
        &self,
        mails: &[Mail],
        cancel: &CancellationToken,
    ) -> Result<(), BatchError> {
        self.service.send_mails_concurrent(mails, cancel).await
    }
}

impl std::fmt::Debug for EmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailClient")
            .field("endpoint", &self.config().endpoint.as_str())
            .field("sender_address", &self.config().sender_address)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EmailClient`].
///
/// Only the configuration is required. Without an explicit transport the
/// client uses [`ReqwestTransport`] built from the configured timeouts;
/// without an explicit clock it uses [`SystemClock`].
#[derive(Default)]
pub struct EmailClientBuilder {
    config: Option<EmailConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl EmailClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: EmailConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom clock for signing timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Configuration` if no configuration was given, or
    /// a transport error if the default HTTP client cannot be built.
    pub fn build(self) -> EmailResult<EmailClient> {
        let config = self.config.ok_or_else(|| EmailError::Configuration {
            message: "Missing required configuration: config".to_string(),
        })?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = ReqwestTransport::builder()
                    .timeout(config.timeout)
                    .connect_timeout(config.connect_timeout);
                if let Some(user_agent) = &config.user_agent {
                    builder = builder.user_agent(user_agent.as_str());
                }
                Arc::new(builder.build()?) as Arc<dyn HttpTransport>
            }
        };

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        Ok(EmailClient {
            service: Arc::new(EmailService::new(Arc::new(config), transport, clock)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::mocks::{MockResponse, MockTransport};

    fn config() -> EmailConfig {
        EmailConfig::builder()
            .endpoint("https://contoso.communication.azure.com")
            .access_key("c2VjcmV0")
            .sender("DoNotReply@contoso.com")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_config() {
        let err = EmailClient::builder().build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_new_uses_reqwest() {
        let client = EmailClient::new(config()).unwrap();
        assert_eq!(client.config().sender_address, "DoNotReply@contoso.com");
    }

    #[test]
    fn test_debug_hides_key() {
        let client = EmailClient::new(config()).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("contoso.communication.azure.com"));
        assert!(!debug.contains("c2VjcmV0"));
    }

    #[tokio::test]
    async fn test_clones_share_transport() {
        let transport = Arc::new(MockTransport::with_default(MockResponse::accepted("m")));
        let client = EmailClient::builder()
            .config(config())
            .transport(transport.clone())
            .build()
            .unwrap();
        let clone = client.clone();

        let mail = crate::MailBuilder::new()
            .to("a@example.com")
            .subject("s")
            .text("t")
            .build()
            .unwrap();

        client.send_mail(&mail).await.unwrap();
        clone.send_mail(&mail).await.unwrap();
        assert_eq!(transport.request_count(), 2);
    }
}
