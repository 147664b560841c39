//! Mock HTTP transport for testing.

use crate::error::{EmailError, EmailResult};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, REQUEST_ID_HEADER};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Create a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// A `202 Accepted` carrying the given message id.
    pub fn accepted(id: &str) -> Self {
        Self::new(
            202,
            json!({"id": id, "status": "Running", "error": {}}).to_string(),
        )
    }

    /// An error envelope with the given status, code and message.
    pub fn error(status: u16, code: &str, message: &str) -> Self {
        Self::new(
            status,
            json!({
                "error": {
                    "code": code,
                    "message": message,
                    "target": "",
                    "details": [],
                    "additionalInfo": []
                }
            })
            .to_string(),
        )
    }

    /// Add a header to the response.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the `x-ms-request-id` header.
    pub fn with_request_id(self, request_id: impl Into<String>) -> Self {
        self.with_header(REQUEST_ID_HEADER, request_id)
    }
}

enum Reply {
    Response(MockResponse),
    Failure(String),
}

type Handler = Box<dyn Fn(&HttpRequest) -> MockResponse + Send + Sync>;

/// Mock HTTP transport for testing.
pub struct MockTransport {
    /// Queue of replies to return.
    replies: Mutex<VecDeque<Reply>>,
    /// Recorded requests.
    requests: Mutex<Vec<HttpRequest>>,
    /// Computes a response when the queue is empty.
    handler: Option<Handler>,
    /// Default response if nothing else applies.
    default_response: Option<MockResponse>,
    /// Artificial latency before each reply.
    delay: Option<Duration>,
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            handler: None,
            default_response: None,
            delay: None,
        }
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        let transport = Self::new();
        for response in responses {
            transport.queue_response(response);
        }
        transport
    }

    /// Create a mock transport with a default response.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::new()
        }
    }

    /// Create a mock transport that computes each response from the request.
    ///
    /// Useful when requests arrive in no particular order.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> MockResponse + Send + Sync + 'static,
    {
        Self {
            handler: Some(Box::new(handler)),
            ..Self::new()
        }
    }

    /// Wait this long before every reply.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Response(response));
    }

    /// Queue a transport failure (no response at all).
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Failure(message.into()));
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> EmailResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.replies.lock().unwrap().pop_front();
        let reply = match queued {
            Some(reply) => reply,
            None => match (&self.handler, &self.default_response) {
                (Some(handler), _) => Reply::Response(handler(&request)),
                (None, Some(response)) => Reply::Response(response.clone()),
                (None, None) => Reply::Failure("No mock response available".to_string()),
            },
        };

        match reply {
            Reply::Response(mock) => Ok(HttpResponse {
                status: mock.status,
                headers: mock.headers,
                body: mock.body,
            }),
            Reply::Failure(message) => Err(EmailError::Transport {
                message,
                source: None,
            }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_replies", &self.replies.lock().unwrap().len())
            .field("recorded_requests", &self.requests.lock().unwrap().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_queue_then_default() {
        let transport = MockTransport::with_default(MockResponse::accepted("default"));
        transport.queue_response(MockResponse::accepted("first"));

        let first = transport
            .send(HttpRequest::new("POST", "https://example.com/1"))
            .await
            .unwrap();
        let second = transport
            .send(HttpRequest::new("POST", "https://example.com/2"))
            .await
            .unwrap();

        assert!(first.text().contains("first"));
        assert!(second.text().contains("default"));
        assert_eq!(transport.request_count(), 2);
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.com/2"
        );
    }

    #[tokio::test]
    async fn test_handler_sees_request() {
        let transport = MockTransport::with_handler(|request| {
            if request.body == b"fail" {
                MockResponse::error(400, "BadRequest", "nope")
            } else {
                MockResponse::accepted("ok")
            }
        });

        let ok = transport
            .send(HttpRequest::new("POST", "u").with_body(b"x".to_vec()))
            .await
            .unwrap();
        let bad = transport
            .send(HttpRequest::new("POST", "u").with_body(b"fail".to_vec()))
            .await
            .unwrap();

        assert_eq!(ok.status, 202);
        assert_eq!(bad.status, 400);
    }

    #[tokio::test]
    async fn test_failures() {
        let transport = MockTransport::new();
        transport.queue_failure("connection reset");

        let err = transport.send(HttpRequest::new("POST", "u")).await.unwrap_err();
        assert_eq!(err.to_string(), "Transport error: connection reset");

        let err = transport.send(HttpRequest::new("POST", "u")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_request_id_helper() {
        let transport =
            MockTransport::with_responses(vec![MockResponse::accepted("m").with_request_id("r-1")]);
        let response = transport.send(HttpRequest::new("POST", "u")).await.unwrap();
        assert_eq!(response.request_id(), Some("r-1"));
    }
}
