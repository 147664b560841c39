//! HMAC-SHA256 shared-key signing for Azure Communication Services.
//!
//! The signing process involves:
//! 1. Hashing the request body (SHA-256, base64) into `x-ms-content-sha256`
//! 2. Formatting the timestamp as an HTTP-date into `x-ms-date`
//! 3. Building the string to sign from method, path, date, host and body hash
//! 4. Calculating HMAC-SHA256 over it with the decoded access key
//! 5. Adding the `Authorization` header with the signed header list and signature

use super::error::SigningError;
use crate::credentials::AccessKeyCredential;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Authorization scheme identifier.
pub const HMAC_SCHEME: &str = "HMAC-SHA256";

/// Headers covered by the signature, in string-to-sign order.
pub const SIGNED_HEADERS: &str = "x-ms-date;host;x-ms-content-sha256";

/// Header carrying the request timestamp.
pub const DATE_HEADER: &str = "x-ms-date";

/// Header carrying the base64 SHA-256 of the body.
pub const CONTENT_HASH_HEADER: &str = "x-ms-content-sha256";

/// Header carrying the scheme, signed header list and signature.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Headers produced by [`sign_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Value of `x-ms-date`.
    pub date: String,
    /// Value of `x-ms-content-sha256`.
    pub content_hash: String,
    /// Value of `Authorization`.
    pub authorization: String,
}

impl SignedHeaders {
    /// Header name/value pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (DATE_HEADER, self.date.as_str()),
            (CONTENT_HASH_HEADER, self.content_hash.as_str()),
            (AUTHORIZATION_HEADER, self.authorization.as_str()),
        ]
        .into_iter()
    }

    /// Insert the signed headers into a header map, replacing existing values.
    pub fn apply(&self, headers: &mut HashMap<String, String>) {
        for (name, value) in self.iter() {
            headers.insert(name.to_string(), value.to_string());
        }
    }
}

/// Base64-encoded SHA-256 digest of `body`.
///
/// An empty body still produces a hash (of zero bytes).
///
/// ```
/// use integrations_azure_email::signing::content_hash;
///
/// assert_eq!(content_hash(b""), "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
/// ```
pub fn content_hash(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    STANDARD.encode(hasher.finalize())
}

/// Format a timestamp as an HTTP-date (RFC 7231 IMF-fixdate).
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use integrations_azure_email::signing::format_http_date;
///
/// let dt = Utc.with_ymd_and_hms(2023, 12, 15, 10, 30, 45).unwrap();
/// assert_eq!(format_http_date(&dt), "Fri, 15 Dec 2023 10:30:45 GMT");
/// ```
pub fn format_http_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the canonical string to sign.
///
/// Format:
/// ```text
/// METHOD\n
/// path_and_query\n
/// date;host;content_hash
/// ```
///
/// The third line mirrors the signed-header list
/// `x-ms-date;host;x-ms-content-sha256`: one value per listed header.
///
/// The method is uppercased and the host lowercased; the trailing values
/// follow the order of [`SIGNED_HEADERS`].
pub fn string_to_sign(
    method: &str,
    path_and_query: &str,
    date: &str,
    host: &str,
    content_hash: &str,
) -> String {
    format!(
        "{}\n{}\n{};{};{}",
        method.to_uppercase(),
        path_and_query,
        date,
        host.to_lowercase(),
        content_hash
    )
}

/// Base64-encoded HMAC-SHA256 of `string_to_sign` under `key`.
pub fn compute_signature(key: &[u8], string_to_sign: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Sign a request with the access key.
///
/// # Arguments
///
/// * `method` - HTTP method (case-insensitive)
/// * `path_and_query` - Request path including the query string, e.g. `/emails:send?api-version=2023-03-31`
/// * `host` - Value of the `Host` header (case-insensitive)
/// * `body` - Exact bytes that will be transmitted
/// * `timestamp` - Request time
/// * `credential` - Access key
///
/// # Errors
///
/// Returns [`SigningError::InvalidKey`] when the access key cannot be
/// decoded, [`SigningError::MissingHeader`] for an empty host, and
/// [`SigningError::InvalidPath`] for a relative path.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use integrations_azure_email::credentials::AccessKeyCredential;
/// use integrations_azure_email::signing::sign_request;
///
/// let credential = AccessKeyCredential::new("dGVzdC1hY2Nlc3Mta2V5LTAxMjM0NTY3ODk=");
/// let timestamp = Utc.with_ymd_and_hms(2023, 12, 15, 10, 30, 45).unwrap();
///
/// let headers = sign_request(
///     "POST",
///     "/emails:send?api-version=2023-03-31",
///     "contoso.communication.azure.com",
///     br#"{"hello":"world"}"#,
///     &timestamp,
///     &credential,
/// )
/// .unwrap();
///
/// assert_eq!(headers.date, "Fri, 15 Dec 2023 10:30:45 GMT");
/// assert!(headers.authorization.starts_with("HMAC-SHA256 SignedHeaders="));
/// ```
pub fn sign_request(
    method: &str,
    path_and_query: &str,
    host: &str,
    body: &[u8],
    timestamp: &DateTime<Utc>,
    credential: &AccessKeyCredential,
) -> Result<SignedHeaders, SigningError> {
    let key = credential.decode_key()?;

    if host.trim().is_empty() {
        return Err(SigningError::MissingHeader {
            header: "host".to_string(),
        });
    }
    if !path_and_query.starts_with('/') {
        return Err(SigningError::InvalidPath {
            message: format!("'{}' must start with '/'", path_and_query),
        });
    }

    let date = format_http_date(timestamp);
    let content_hash = content_hash(body);
    let to_sign = string_to_sign(method, path_and_query, &date, host, &content_hash);
    let signature = compute_signature(&key, &to_sign);

    let authorization = format!(
        "{} SignedHeaders={}&Signature={}",
        HMAC_SCHEME, SIGNED_HEADERS, signature
    );

    Ok(SignedHeaders {
        date,
        content_hash,
        authorization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KEY: &str = "dGVzdC1hY2Nlc3Mta2V5LTAxMjM0NTY3ODk=";
    const HOST: &str = "contoso.communication.azure.com";
    const PATH: &str = "/emails:send?api-version=2023-03-31";

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 15, 10, 30, 45).unwrap()
    }

    #[test]
    fn test_content_hash_known_values() {
        assert_eq!(
            content_hash(b""),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
        assert_eq!(
            content_hash(br#"{"hello":"world"}"#),
            "k6I5cakU5erL8KjSUVTNownDwccvu5kU1Hxg88toFYg="
        );
    }

    #[test]
    fn test_string_to_sign_layout() {
        let s = string_to_sign("post", PATH, "Fri, 15 Dec 2023 10:30:45 GMT", "Contoso.Communication.Azure.com", "HASH");
        assert_eq!(
            s,
            "POST\n/emails:send?api-version=2023-03-31\nFri, 15 Dec 2023 10:30:45 GMT;contoso.communication.azure.com;HASH"
        );
    }

    #[test]
    fn test_last_line_matches_signed_header_list() {
        let credential = AccessKeyCredential::new(KEY);
        let signed = sign_request("POST", PATH, HOST, b"{}", &timestamp(), &credential).unwrap();
        let s = string_to_sign("POST", PATH, &signed.date, HOST, &signed.content_hash);

        let values: Vec<&str> = s.lines().last().unwrap().split(';').collect();
        let names: Vec<&str> = SIGNED_HEADERS.split(';').collect();
        assert_eq!(names, ["x-ms-date", "host", "x-ms-content-sha256"]);
        assert_eq!(values.len(), names.len());

        let mut headers = HashMap::new();
        signed.apply(&mut headers);
        headers.insert("host".to_string(), HOST.to_string());
        for (name, value) in names.iter().zip(&values) {
            assert_eq!(headers.get(*name).map(String::as_str), Some(*value));
        }
    }

    #[test]
    fn test_sign_request_known_signature() {
        let credential = AccessKeyCredential::new(KEY);
        let headers = sign_request(
            "POST",
            PATH,
            HOST,
            br#"{"hello":"world"}"#,
            &timestamp(),
            &credential,
        )
        .unwrap();

        assert_eq!(headers.date, "Fri, 15 Dec 2023 10:30:45 GMT");
        assert_eq!(
            headers.content_hash,
            "k6I5cakU5erL8KjSUVTNownDwccvu5kU1Hxg88toFYg="
        );
        assert_eq!(
            headers.authorization,
            "HMAC-SHA256 SignedHeaders=x-ms-date;host;x-ms-content-sha256&Signature=XKsXaQJJwcL00Bl8juQySUvHU/sOsobh0sCdRSw0bFE="
        );
    }

    #[test]
    fn test_sign_request_is_deterministic() {
        let credential = AccessKeyCredential::new(KEY);
        let first = sign_request("POST", PATH, HOST, b"body", &timestamp(), &credential).unwrap();
        let second = sign_request("POST", PATH, HOST, b"body", &timestamp(), &credential).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sign_request_empty_body_still_hashed() {
        let credential = AccessKeyCredential::new(KEY);
        let headers = sign_request("GET", "/", HOST, b"", &timestamp(), &credential).unwrap();
        assert_eq!(headers.content_hash, content_hash(b""));
    }

    #[test]
    fn test_sign_request_rejects_malformed_key() {
        let credential = AccessKeyCredential::new("%%%not-base64%%%");
        let result = sign_request("POST", PATH, HOST, b"{}", &timestamp(), &credential);
        assert!(matches!(result, Err(SigningError::InvalidKey(_))));
    }

    #[test]
    fn test_sign_request_rejects_empty_host() {
        let credential = AccessKeyCredential::new(KEY);
        let result = sign_request("POST", PATH, " ", b"{}", &timestamp(), &credential);
        assert!(matches!(result, Err(SigningError::MissingHeader { .. })));
    }

    #[test]
    fn test_sign_request_rejects_relative_path() {
        let credential = AccessKeyCredential::new(KEY);
        let result = sign_request("POST", "emails:send", HOST, b"{}", &timestamp(), &credential);
        assert!(matches!(result, Err(SigningError::InvalidPath { .. })));
    }

    #[test]
    fn test_apply_inserts_all_headers() {
        let credential = AccessKeyCredential::new(KEY);
        let signed = sign_request("POST", PATH, HOST, b"{}", &timestamp(), &credential).unwrap();

        let mut headers = HashMap::new();
        signed.apply(&mut headers);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("x-ms-date"), Some(&signed.date));
        assert_eq!(headers.get("x-ms-content-sha256"), Some(&signed.content_hash));
        assert_eq!(headers.get("authorization"), Some(&signed.authorization));
    }
}
