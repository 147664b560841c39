//! Response envelopes returned by the email endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a `202 Accepted` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailResponse {
    /// Operation id assigned to the message.
    pub id: String,
    /// Operation status (e.g., "Running"), when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Present but empty on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

/// Body of any non-202 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The top-level error.
    pub error: ErrorDetail,
}

/// A service error, possibly with nested causes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "InvalidRecipient").
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    /// Human-readable message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// The part of the request the error refers to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,
    /// Nested errors.
    ///
    /// Entries may arrive bare or wrapped as `{"error": {...}}`; both
    /// decode to the same `ErrorDetail`.
    #[serde(default, deserialize_with = "nested_details")]
    pub details: Vec<ErrorDetail>,
    /// Free-form extra information.
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_info: Vec<AdditionalInfo>,
}

impl ErrorDetail {
    /// Whether every field is empty, as in the `error` member of a success body.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
            && self.message.is_empty()
            && self.target.is_empty()
            && self.details.is_empty()
            && self.additional_info.is_empty()
    }

    /// Depth-first walk over this error and all nested details.
    ///
    /// ```
    /// use integrations_azure_email::types::ErrorDetail;
    ///
    /// let detail = ErrorDetail {
    ///     code: "BadRequest".to_string(),
    ///     details: vec![ErrorDetail {
    ///         code: "InvalidRecipient".to_string(),
    ///         ..Default::default()
    ///     }],
    ///     ..Default::default()
    /// };
    ///
    /// let codes: Vec<&str> = detail.walk().map(|d| d.code.as_str()).collect();
    /// assert_eq!(codes, ["BadRequest", "InvalidRecipient"]);
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = &ErrorDetail> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.details.iter().rev());
            Some(next)
        })
    }
}

/// One entry of `additionalInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    /// Kind of information.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub info_type: String,
    /// Arbitrary JSON payload.
    #[serde(default)]
    pub info: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NestedDetail {
    Wrapped { error: ErrorDetail },
    Bare(ErrorDetail),
}

impl From<NestedDetail> for ErrorDetail {
    fn from(nested: NestedDetail) -> Self {
        match nested {
            NestedDetail::Wrapped { error } | NestedDetail::Bare(error) => error,
        }
    }
}

fn nested_details<'de, D>(deserializer: D) -> Result<Vec<ErrorDetail>, D::Error>
where
    D: Deserializer<'de>,
{
    let nested: Vec<NestedDetail> = null_as_default(deserializer)?;
    Ok(nested.into_iter().map(ErrorDetail::from).collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
