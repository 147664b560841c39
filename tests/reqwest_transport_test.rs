//! End-to-end tests against a local HTTP server.

use integrations_azure_email::builders::MailBuilder;
use integrations_azure_email::config::EmailConfig;
use integrations_azure_email::error::ErrorKind;
use integrations_azure_email::EmailClient;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(server: &MockServer, timeout: Duration) -> EmailClient {
    let config = EmailConfig::builder()
        .connection_string(format!("endpoint={}/;accesskey=c2VjcmV0", server.uri()))
        .sender("DoNotReply@contoso.com")
        .user_agent("azure-email-tests/1.0")
        .timeout(timeout)
        .build()
        .unwrap();
    EmailClient::new(config).unwrap()
}

fn mail() -> integrations_azure_email::Mail {
    MailBuilder::new()
        .to("user@example.com")
        .subject("Hello")
        .text("Hi")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_signed_request_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails:send"))
        .and(query_param("api-version", "2023-03-31"))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", "azure-email-tests/1.0"))
        .and(header_exists("x-ms-date"))
        .and(header_exists("x-ms-content-sha256"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "senderAddress": "DoNotReply@contoso.com",
            "userEngagementTrackingDisabled": true
        })))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"id": "op-1", "status": "Running"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let id = client.send_mail(&mail()).await.unwrap();

    assert_eq!(id, "op-1");
}

#[tokio::test]
async fn test_error_envelope_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("x-ms-request-id", "req-401")
                .set_body_json(json!({
                    "error": {"code": "Denied", "message": "Denied by the resource provider."}
                })),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let err = client.send_mail(&mail()).await.unwrap_err();

    assert_eq!(err.to_string(), "Denied by the resource provider.");
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.request_id(), Some("req-401"));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({"id": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_millis(100));
    let err = client.send_mail(&mail()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_concurrent_batch_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"id": "m"})))
        .expect(4)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Duration::from_secs(5));
    let mails = vec![mail(), mail(), mail(), mail()];

    client
        .send_mails_concurrent(&mails, &CancellationToken::new())
        .await
        .unwrap();
}
