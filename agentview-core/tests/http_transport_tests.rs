//! HTTP transport tests against a mock backend

use agentview_core::config::ClientConfig;
use agentview_core::http::{HttpTransport, RequestOptions, Transport, TransportError};
use agentview_core::protocol::ChatRequest;
use agentview_core::session::{ChatSession, ChatView, SessionError, TurnState};
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_BODY: &str = concat!(
    "data: {\"thought\":{\"tool\":\"list_tables\",\"input\":{}}}\n",
    "\n",
    "data: {\"text\":\"Tables: \"}\n",
    "data: {\"text\":\"**flights**\"}\n",
);

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::for_base_url(server.uri())
}

#[tokio::test]
async fn test_streamed_turn_through_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("content-type", "application/json"))
        .and(header_exists("x-request-id"))
        .and(body_json(json!({
            "message": "What tables are available?",
            "user_id": "default_user",
            "session_id": "default_session"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STREAM_BODY, "text/event-stream"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let transport = HttpTransport::from_config(&config).expect("Failed to create transport");
    let mut session = ChatSession::from_config(&config, transport, ChatView::new());

    let turn = session.send("What tables are available?").await.unwrap();
    assert_eq!(turn.state(), TurnState::Completed);
    assert_eq!(turn.text(), "Tables: **flights**");
    assert_eq!(turn.steps().len(), 1);
    assert_eq!(turn.steps()[0].tool, "list_tables");
    assert_eq!(
        session.sink().last_agent().unwrap().markup,
        "<p>Tables: <strong>flights</strong></p>\n"
    );
}

#[tokio::test]
async fn test_raw_body_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STREAM_BODY, "text/event-stream"))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::from_config(&config_for(&mock_server)).unwrap();
    let mut stream = transport
        .open_stream(&ChatRequest::new("hi"), &RequestOptions::new())
        .await
        .unwrap();

    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(body, STREAM_BODY.as_bytes());
}

#[tokio::test]
async fn test_server_error_fails_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "agent crashed"})))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let transport = HttpTransport::from_config(&config).unwrap();
    let mut session = ChatSession::from_config(&config, transport, ChatView::new());

    let err = session.send("hi").await.unwrap_err();
    match err {
        SessionError::Transport(TransportError::Status {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 500);
            assert!(message.starts_with("agent crashed [request_id: "));
        }
        other => panic!("Expected status error, got {:?}", other),
    }

    let agent = session.sink().last_agent().unwrap();
    assert_eq!(agent.error.as_deref(), Some(config.error_message.as_str()));
}

#[tokio::test]
async fn test_connection_refused() {
    // nothing listens on this port once the server is dropped
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let transport = HttpTransport::from_config(&ClientConfig::for_base_url(uri)).unwrap();
    let result = transport
        .open_stream(&ChatRequest::new("hi"), &RequestOptions::new())
        .await;
    assert!(matches!(result, Err(TransportError::Network { .. })));
}

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::from_config(&config_for(&mock_server)).unwrap();
    assert!(transport.health_check().await.is_ok());
}

#[tokio::test]
async fn test_health_check_unhealthy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "starting"})))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::from_config(&config_for(&mock_server)).unwrap();
    assert!(matches!(
        transport.health_check().await,
        Err(TransportError::Unhealthy { .. })
    ));
}
