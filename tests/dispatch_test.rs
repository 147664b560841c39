//! Integration tests for single-mail dispatch.

use chrono::{TimeZone, Utc};
use integrations_azure_email::config::EmailConfig;
use integrations_azure_email::error::{EmailError, ErrorKind};
use integrations_azure_email::mocks::{MockResponse, MockTransport};
use integrations_azure_email::signing::{
    compute_signature, content_hash, string_to_sign, FixedClock,
};
use integrations_azure_email::types::{Attachment, EmailAddress, EmailContent, Mail, Recipients};
use integrations_azure_email::EmailClient;
use std::sync::Arc;

const RAW_KEY: &[u8] = b"test-access-key-0123456789";
const KEY: &str = "dGVzdC1hY2Nlc3Mta2V5LTAxMjM0NTY3ODk=";
const SENDER: &str = "DoNotReply@contoso.com";

fn create_test_config(access_key: &str) -> EmailConfig {
    EmailConfig::builder()
        .endpoint("https://contoso.communication.azure.com/")
        .access_key(access_key)
        .sender(SENDER)
        .build()
        .unwrap()
}

fn create_test_client(transport: Arc<MockTransport>) -> EmailClient {
    create_test_client_with_key(transport, KEY)
}

fn create_test_client_with_key(transport: Arc<MockTransport>, access_key: &str) -> EmailClient {
    EmailClient::builder()
        .config(create_test_config(access_key))
        .transport(transport)
        .clock(Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2023, 12, 15, 10, 30, 45).unwrap(),
        )))
        .build()
        .unwrap()
}

fn sample_mail() -> Mail {
    Mail::new(
        Recipients::new()
            .add_to(EmailAddress::with_name("ann@example.com", "Ann"))
            .add_bcc("audit@example.com"),
        EmailContent::new("Invoice").with_text("Attached.").with_html("<p>Attached.</p>"),
    )
    .with_attachment(Attachment::new("invoice.txt", "text/plain", "MTAw"))
    .with_reply_to("billing@contoso.com")
}

#[tokio::test]
async fn test_send_mail_success() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::new(
        202,
        r#"{"id":"abc123","error":{}}"#,
    )]));
    let client = create_test_client(transport.clone());

    let id = client.send_mail(&sample_mail()).await.unwrap();
    assert_eq!(id, "abc123");

    let recorded = transport.last_request().unwrap();
    assert_eq!(recorded.method, "POST");
    assert_eq!(
        recorded.url,
        "https://contoso.communication.azure.com/emails:send?api-version=2023-03-31"
    );
}

#[tokio::test]
async fn test_send_mail_api_error() {
    let body = r#"{
        "error": {
            "code": "BadRequest",
            "message": "bad address",
            "target": "recipients.to",
            "details": [
                {"code": "InvalidEmailAddress", "message": "ann@ is invalid", "target": "to[0]"}
            ],
            "additionalInfo": [{"type": "Hint", "info": {"field": "to"}}]
        }
    }"#;
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::new(400, body).with_request_id("req-7")
    ]));
    let client = create_test_client(transport);

    let err = client.send_mail(&sample_mail()).await.unwrap_err();

    assert_eq!(err.to_string(), "bad address");
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.error_code(), Some("BadRequest"));
    assert_eq!(err.request_id(), Some("req-7"));
    assert!(!err.is_retryable());

    let detail = err.detail().unwrap();
    assert_eq!(detail.details[0].code, "InvalidEmailAddress");
    assert_eq!(detail.additional_info[0].info["field"], "to");
}

#[tokio::test]
async fn test_throttling_is_retryable() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        429,
        "TooManyRequests",
        "slow down",
    )]));
    let client = create_test_client(transport);

    let err = client.send_mail(&sample_mail()).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_body_hash_matches_header() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::accepted("m")));
    let client = create_test_client(transport.clone());

    client.send_mail(&sample_mail()).await.unwrap();

    let recorded = transport.last_request().unwrap();
    assert_eq!(
        recorded.header("x-ms-content-sha256"),
        Some(content_hash(&recorded.body).as_str())
    );
}

#[tokio::test]
async fn test_signature_recomputes() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::accepted("m")));
    let client = create_test_client(transport.clone());

    client.send_mail(&sample_mail()).await.unwrap();

    let recorded = transport.last_request().unwrap();
    let date = recorded.header("x-ms-date").unwrap();
    assert_eq!(date, "Fri, 15 Dec 2023 10:30:45 GMT");

    let expected = compute_signature(
        RAW_KEY,
        &string_to_sign(
            "POST",
            "/emails:send?api-version=2023-03-31",
            date,
            "contoso.communication.azure.com",
            &content_hash(&recorded.body),
        ),
    );
    assert_eq!(
        recorded.header("authorization").unwrap(),
        format!(
            "HMAC-SHA256 SignedHeaders=x-ms-date;host;x-ms-content-sha256&Signature={}",
            expected
        )
    );
}

#[tokio::test]
async fn test_wire_payload() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::accepted("m")));
    let client = create_test_client(transport.clone());

    client.send_mail(&sample_mail()).await.unwrap();

    let recorded = transport.last_request().unwrap();
    let body: serde_json::Value = serde_json::from_slice(&recorded.body).unwrap();

    assert_eq!(
        body,
        serde_json::json!({
            "senderAddress": SENDER,
            "content": {
                "subject": "Invoice",
                "plainText": "Attached.",
                "html": "<p>Attached.</p>"
            },
            "recipients": {
                "to": [{"address": "ann@example.com", "displayName": "Ann"}],
                "bcc": [{"address": "audit@example.com"}]
            },
            "attachments": [
                {"name": "invoice.txt", "contentType": "text/plain", "contentInBase64": "MTAw"}
            ],
            "replyTo": [{"address": "billing@contoso.com"}],
            "userEngagementTrackingDisabled": true
        })
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::new(
        202,
        "<html>accepted</html>",
    )]));
    let client = create_test_client(transport);

    let err = client.send_mail(&sample_mail()).await.unwrap_err();
    assert!(matches!(err, EmailError::Decode { status: 202, .. }));
}

#[tokio::test]
async fn test_malformed_error_body_is_decode_error() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::new(
        502,
        "Bad Gateway",
    )]));
    let client = create_test_client(transport);

    let err = client.send_mail(&sample_mail()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_bad_key_never_reaches_transport() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::accepted("m")));
    let client = create_test_client_with_key(transport.clone(), "!!not-base64!!");

    let err = client.send_mail(&sample_mail()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Credential);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_transport_failure() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_failure("connection refused");
    let client = create_test_client(transport.clone());

    let err = client.send_mail(&sample_mail()).await.unwrap_err();

    assert!(matches!(err, EmailError::Transport { .. }));
    assert!(err.is_retryable());
    assert_eq!(transport.request_count(), 1);
}
