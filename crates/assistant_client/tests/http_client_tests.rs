//! HTTP contract tests against a mock backend.

use assistant_client::{
    AssistantTransport, AttachmentPayload, HistoryEntry, HttpAssistantClient, SendMessageRequest,
    TransportError, Utf8StreamDecoder,
};
use assistant_core::config::AssistantConfig;
use assistant_core::message::{AttachmentKind, Role};
use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn client_for(server: &MockServer) -> HttpAssistantClient {
    let config = AssistantConfig {
        base_url: server.uri(),
        ..AssistantConfig::default()
    };
    HttpAssistantClient::new(&config).expect("client")
}

fn sample_request() -> SendMessageRequest {
    SendMessageRequest {
        message: "What did I spend in July?".into(),
        conversation_history: vec![
            HistoryEntry {
                role: Role::User,
                content: "hello".into(),
            },
            HistoryEntry {
                role: Role::Assistant,
                content: "hi there".into(),
            },
        ],
        attachments: Some(vec![AttachmentPayload {
            kind: AttachmentKind::Image,
            name: "receipt.png".into(),
            url: "local://attachment/1".into(),
            size: Some(3),
        }]),
    }
}

#[tokio::test]
async fn streaming_delivers_raw_bytes() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/send-message-stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("Hello, world".as_bytes().to_vec(), "text/plain"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client
        .send_streaming(&sample_request())
        .await
        .expect("stream established");

    let mut decoder = Utf8StreamDecoder::new();
    let mut content = String::new();
    while let Some(chunk) = stream.next().await {
        content.push_str(&decoder.decode(&chunk.expect("chunk")));
    }
    content.push_str(&decoder.finish());

    assert_eq!(content, "Hello, world");
}

#[tokio::test]
async fn streaming_sends_the_contract_body() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/send-message-stream"))
        .and(body_partial_json(json!({
            "message": "What did I spend in July?",
            "conversation_history": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "hi there"},
            ],
            "attachments": [
                {"kind": "image", "name": "receipt.png", "url": "local://attachment/1", "size": 3},
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"ok".to_vec(), "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client
        .send_streaming(&sample_request())
        .await
        .expect("stream established");
    while let Some(chunk) = stream.next().await {
        chunk.expect("chunk");
    }
}

#[tokio::test]
async fn streaming_non_success_status_fails_establishment() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/send-message-stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = match client.send_streaming(&sample_request()).await {
        Ok(_) => panic!("establishment must fail"),
        Err(e) => e,
    };
    assert!(matches!(err, TransportError::Status { code: 500 }));
}

#[tokio::test]
async fn blocking_parses_the_reply_body() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "You spent $42.",
            "timestamp": "2026-08-06T12:00:00Z",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .send_blocking(&sample_request())
        .await
        .expect("blocking reply");
    assert_eq!(reply.response, "You spent $42.");
    assert!(reply.timestamp.is_some());
}

#[tokio::test]
async fn blocking_reply_timestamp_is_optional() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .send_blocking(&sample_request())
        .await
        .expect("blocking reply");
    assert_eq!(reply.response, "ok");
    assert!(reply.timestamp.is_none());
}

#[tokio::test]
async fn blocking_malformed_body_is_a_json_error() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .send_blocking(&sample_request())
        .await
        .expect_err("parse must fail");
    assert!(matches!(err, TransportError::Json(_)));
}

#[tokio::test]
async fn blocking_non_success_status_fails() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/send-message"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .send_blocking(&sample_request())
        .await
        .expect_err("status must fail");
    assert!(matches!(err, TransportError::Status { code: 503 }));
}

#[tokio::test]
async fn reset_distinguishes_success_from_failure() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/assistant/reset-chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.reset_session().await.expect("reset ok");

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/assistant/reset-chat"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.reset_session().await.expect_err("reset must fail");
    assert!(matches!(err, TransportError::Status { code: 401 }));
}
