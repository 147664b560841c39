//! Parsing for `endpoint=...;accesskey=...` connection strings.

use super::error::ConfigError;

/// The two parts of a Communication Services connection string.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    /// Resource endpoint, e.g. `https://contoso.communication.azure.com/`.
    pub endpoint: String,
    /// Base64 access key.
    pub access_key: String,
}

impl ConnectionString {
    /// Parse a connection string.
    ///
    /// Keys are case-insensitive, pairs are separated by `;`, and a value may
    /// itself contain `=` (base64 padding). Unknown keys are ignored.
    ///
    /// ```
    /// use integrations_azure_email::config::ConnectionString;
    ///
    /// let parsed = ConnectionString::parse(
    ///     "endpoint=https://contoso.communication.azure.com/;accesskey=c2VjcmV0==",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(parsed.endpoint, "https://contoso.communication.azure.com/");
    /// assert_eq!(parsed.access_key, "c2VjcmV0==");
    /// ```
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut endpoint = None;
        let mut access_key = None;

        for segment in input.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| ConfigError::Invalid {
                message: format!("connection string segment '{}' is not key=value", segment),
            })?;

            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value.trim().to_string()),
                "accesskey" => access_key = Some(value.trim().to_string()),
                _ => {}
            }
        }

        Ok(Self {
            endpoint: endpoint.filter(|v| !v.is_empty()).ok_or_else(|| {
                ConfigError::MissingField {
                    field: "endpoint".to_string(),
                }
            })?,
            access_key: access_key.filter(|v| !v.is_empty()).ok_or_else(|| {
                ConfigError::MissingField {
                    field: "accesskey".to_string(),
                }
            })?,
        })
    }
}

impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionString")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}
