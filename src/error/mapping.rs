//! Response envelope reconciliation for the email endpoint.
//!
//! The service answers `POST /emails:send` with one of two JSON shapes,
//! discriminated purely by HTTP status:
//!
//! ```json
//! // 202 Accepted
//! {"id": "0a1b2c", "status": "Running", "error": {}}
//!
//! // anything else
//! {"error": {"code": "...", "message": "...", "target": "...",
//!            "details": [...], "additionalInfo": [{"type": "...", "info": {}}]}}
//! ```
//!
//! A body that does not parse as the shape its status implies is a
//! [`EmailError::Decode`], including on 202.

use super::{EmailError, EmailResult};
use crate::types::{ErrorResponse, SendMailResponse};

/// Status code returned when a message has been queued.
pub(crate) const ACCEPTED: u16 = 202;

/// Turn a raw response into a message id or an error.
///
/// # Examples
///
/// ```rust
/// use integrations_azure_email::error::map_send_response;
///
/// let id = map_send_response(202, br#"{"id":"abc123","error":{}}"#, None).unwrap();
/// assert_eq!(id, "abc123");
///
/// let err = map_send_response(
///     400,
///     br#"{"error":{"code":"InvalidRecipient","message":"bad address","target":"","details":[],"additionalInfo":[]}}"#,
///     None,
/// )
/// .unwrap_err();
/// assert_eq!(err.to_string(), "bad address");
/// ```
pub fn map_send_response(status: u16, body: &[u8], request_id: Option<&str>) -> EmailResult<String> {
    if status == ACCEPTED {
        parse_success_response(body).map(|response| response.id)
    } else {
        Err(parse_error_response(status, body, request_id))
    }
}

/// Parse a 202 body.
///
/// # Errors
///
/// Returns [`EmailError::Decode`] if the body is not a success envelope.
pub fn parse_success_response(body: &[u8]) -> EmailResult<SendMailResponse> {
    serde_json::from_slice(body).map_err(|source| EmailError::Decode {
        status: ACCEPTED,
        source,
    })
}

/// Parse a non-202 body into the matching error.
///
/// Always returns an error: [`EmailError::Api`] when the body is an error
/// envelope, [`EmailError::Decode`] otherwise.
pub fn parse_error_response(status: u16, body: &[u8], request_id: Option<&str>) -> EmailError {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(response) => EmailError::Api {
            status,
            error: response.error,
            request_id: request_id.map(str::to_string),
        },
        Err(source) => EmailError::Decode { status, source },
    }
}
