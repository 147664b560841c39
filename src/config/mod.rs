//! Configuration module for the email client.
//!
//! This module provides configuration types and builders for creating and customizing
//! the client behavior, including:
//!
//! - Endpoint and access key (directly or from a connection string)
//! - The sender address stamped on every mail
//! - Timeout and batch concurrency settings
//! - User agent customization

use std::time::Duration;

use url::Url;

mod connection_string;
pub mod error;

pub use connection_string::ConnectionString;
pub use error::ConfigError;

use crate::credentials::AccessKeyCredential;

/// API version sent as the `api-version` query parameter.
pub const DEFAULT_API_VERSION: &str = "2023-03-31";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of sends in flight for concurrent batches.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Environment variable holding a full connection string.
pub const ENV_CONNECTION_STRING: &str = "AZURE_EMAIL_CONNECTION_STRING";
/// Environment variable holding the resource endpoint.
pub const ENV_ENDPOINT: &str = "AZURE_EMAIL_ENDPOINT";
/// Environment variable holding the base64 access key.
pub const ENV_ACCESS_KEY: &str = "AZURE_EMAIL_ACCESS_KEY";
/// Environment variable holding the sender address.
pub const ENV_SENDER: &str = "AZURE_EMAIL_SENDER";

/// Configuration for the email client.
///
/// Immutable once built; the client shares it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    /// Resource endpoint, e.g. `https://contoso.communication.azure.com/`.
    pub endpoint: Url,

    /// Access key used to sign requests.
    pub credential: AccessKeyCredential,

    /// Sender address substituted into every outgoing mail.
    pub sender_address: String,

    /// Value of the `api-version` query parameter.
    pub api_version: String,

    /// Timeout for a single send, from request to response.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Maximum sends in flight for concurrent batches.
    pub max_concurrency: usize,

    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl EmailConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_azure_email::config::EmailConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = EmailConfig::builder()
    ///     .endpoint("https://contoso.communication.azure.com")
    ///     .access_key("c2VjcmV0")
    ///     .sender("DoNotReply@contoso.com")
    ///     .build()?;
    ///
    /// assert_eq!(config.host(), "contoso.communication.azure.com");
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> EmailConfigBuilder {
        EmailConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads `AZURE_EMAIL_CONNECTION_STRING`, or the pair
    /// `AZURE_EMAIL_ENDPOINT` + `AZURE_EMAIL_ACCESS_KEY` when no connection
    /// string is set, plus `AZURE_EMAIL_SENDER`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_azure_email::config::EmailConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = EmailConfig::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sender = lookup(ENV_SENDER).ok_or_else(|| ConfigError::Environment {
            message: format!("{} must be set", ENV_SENDER),
        })?;

        let builder = match lookup(ENV_CONNECTION_STRING) {
            Some(connection_string) => Self::builder().connection_string(connection_string),
            None => {
                let endpoint = lookup(ENV_ENDPOINT).ok_or_else(|| ConfigError::Environment {
                    message: format!(
                        "{} or {} and {} must be set",
                        ENV_CONNECTION_STRING, ENV_ENDPOINT, ENV_ACCESS_KEY
                    ),
                })?;
                let access_key = lookup(ENV_ACCESS_KEY).ok_or_else(|| ConfigError::Environment {
                    message: format!("{} must be set alongside {}", ENV_ACCESS_KEY, ENV_ENDPOINT),
                })?;
                Self::builder().endpoint(endpoint).access_key(access_key)
            }
        };

        builder.sender(sender).build()
    }

    /// Host name of the endpoint, as signed and sent in the `Host` header.
    ///
    /// Includes the port when the endpoint names a non-default one.
    pub fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Path and query of the send operation.
    ///
    /// ```
    /// use integrations_azure_email::config::EmailConfig;
    ///
    /// let config = EmailConfig::builder()
    ///     .endpoint("https://contoso.communication.azure.com/")
    ///     .access_key("c2VjcmV0")
    ///     .sender("DoNotReply@contoso.com")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.send_path(), "/emails:send?api-version=2023-03-31");
    /// ```
    pub fn send_path(&self) -> String {
        let base = self.endpoint.path().trim_end_matches('/');
        format!("{}/emails:send?api-version={}", base, self.api_version)
    }

    /// Absolute URL of the send operation.
    pub fn send_url(&self) -> String {
        format!(
            "{}://{}{}",
            self.endpoint.scheme(),
            self.host(),
            self.send_path()
        )
    }
}

/// Builder for creating client configurations.
#[derive(Default)]
pub struct EmailConfigBuilder {
    endpoint: Option<String>,
    access_key: Option<String>,
    connection_string: Option<String>,
    sender_address: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_concurrency: Option<usize>,
    user_agent: Option<String>,
}

impl EmailConfigBuilder {
    /// Set the resource endpoint.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_azure_email::config::EmailConfig;
    ///
    /// let builder = EmailConfig::builder().endpoint("https://contoso.communication.azure.com");
    /// ```
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the base64 access key.
    pub fn access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = Some(key.into());
        self
    }

    /// Set endpoint and access key from an `endpoint=...;accesskey=...`
    /// connection string.
    ///
    /// Values set explicitly with [`endpoint`](Self::endpoint) or
    /// [`access_key`](Self::access_key) take precedence. The string is parsed
    /// in [`build`](Self::build).
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_azure_email::config::EmailConfig;
    ///
    /// let config = EmailConfig::builder()
    ///     .connection_string("endpoint=https://contoso.communication.azure.com/;accesskey=c2VjcmV0")
    ///     .sender("DoNotReply@contoso.com")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.host(), "contoso.communication.azure.com");
    /// ```
    pub fn connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Set the sender address used for every mail.
    pub fn sender(mut self, address: impl Into<String>) -> Self {
        self.sender_address = Some(address.into());
        self
    }

    /// Override the API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the request timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use integrations_azure_email::config::EmailConfig;
    ///
    /// let builder = EmailConfig::builder().timeout(Duration::from_secs(60));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set how many sends a concurrent batch keeps in flight.
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration.
    ///
    /// The access key is only checked for presence here; it is decoded when
    /// a request is signed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the endpoint, access key or
    /// sender is not set, and `ConfigError::Invalid` for an unparseable
    /// endpoint, a zero timeout or a zero concurrency limit.
    pub fn build(self) -> Result<EmailConfig, ConfigError> {
        let parsed = self
            .connection_string
            .as_deref()
            .map(ConnectionString::parse)
            .transpose()?;

        let (parsed_endpoint, parsed_key) = match parsed {
            Some(ConnectionString {
                endpoint,
                access_key,
            }) => (Some(endpoint), Some(access_key)),
            None => (None, None),
        };

        let endpoint = self
            .endpoint
            .or(parsed_endpoint)
            .ok_or_else(|| ConfigError::MissingField {
                field: "endpoint".to_string(),
            })?;
        let endpoint = parse_endpoint(&endpoint)?;

        let access_key = self
            .access_key
            .or(parsed_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "access_key".to_string(),
            })?;

        let sender_address = self
            .sender_address
            .filter(|sender| !sender.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "sender_address".to_string(),
            })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::Invalid {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        let max_concurrency = self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                message: "max_concurrency must be at least 1".to_string(),
            });
        }

        Ok(EmailConfig {
            endpoint,
            credential: AccessKeyCredential::new(access_key),
            sender_address,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            max_concurrency,
            user_agent: self.user_agent,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        message: format!("endpoint '{}' is not a valid URL: {}", raw, e),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            message: format!("endpoint scheme must be http or https, got '{}'", url.scheme()),
        });
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::Invalid {
            message: format!("endpoint '{}' has no host", raw),
        });
    }

    if url.query().is_some() {
        return Err(ConfigError::Invalid {
            message: "endpoint must not carry a query string".to_string(),
        });
    }

    Ok(url)
}
