//! HTTP client behavior against a mock chat endpoint.

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use sana_chat::{ApiError, ChatApi, ChatConfig, HttpChatApi};

/// Serve `app` on an ephemeral port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn api_for(base_url: String) -> HttpChatApi {
    let mut config = ChatConfig::new(base_url);
    config.ask_timeout = Duration::from_millis(500);
    config.probe_timeout = Duration::from_millis(500);
    HttpChatApi::new(config)
}

#[tokio::test]
async fn test_ask_success() {
    let app = Router::new().route(
        "/ask",
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["question"], "Hello");
            Json(serde_json::json!({
                "answer": "Hi!",
                "id": 7,
                "timestamp": "2025-01-15T10:00:00Z",
            }))
        }),
    );
    let api = api_for(serve(app).await);

    let reply = api.ask("Hello").await.unwrap();
    assert_eq!(reply.text, "Hi!");
    assert_eq!(reply.id, Some(7));
    assert!(reply.timestamp.is_some());
    assert!(!reply.degraded);
}

#[tokio::test]
async fn test_ask_accepts_alternate_answer_key() {
    let app = Router::new().route(
        "/ask",
        post(|| async { Json(serde_json::json!({ "response": "from response key" })) }),
    );
    let api = api_for(serve(app).await);

    let reply = api.ask("Hello").await.unwrap();
    assert_eq!(reply.text, "from response key");
}

#[tokio::test]
async fn test_ask_degraded_reply() {
    let app = Router::new().route(
        "/ask",
        post(|| async { Json(serde_json::json!({ "answer": "fallback", "is_error": true })) }),
    );
    let api = api_for(serve(app).await);

    let reply = api.ask("Hello").await.unwrap();
    assert!(reply.degraded);
}

#[tokio::test]
async fn test_ask_server_error() {
    let app = Router::new().route(
        "/ask",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let api = api_for(serve(app).await);

    let err = api.ask("Hello").await.unwrap_err();
    assert!(matches!(err, ApiError::Http(500)));
}

#[tokio::test]
async fn test_ask_malformed_body() {
    let app = Router::new().route(
        "/ask",
        post(|| async { Json(serde_json::json!({ "status": "ok" })) }),
    );
    let api = api_for(serve(app).await);

    let err = api.ask("Hello").await.unwrap_err();
    assert!(matches!(err, ApiError::Malformed(_)));
}

#[tokio::test]
async fn test_ask_timeout() {
    let app = Router::new().route(
        "/ask",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(serde_json::json!({ "answer": "too late" }))
        }),
    );
    let api = api_for(serve(app).await);

    let err = api.ask("Hello").await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout));
}

#[tokio::test]
async fn test_probe_success() {
    let app = Router::new().route("/", get(|| async { "ok" }));
    let api = api_for(serve(app).await);

    api.probe().await.unwrap();
}

#[tokio::test]
async fn test_probe_non_success_status() {
    let app = Router::new().route("/", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let api = api_for(serve(app).await);

    let err = api.probe().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(503)));
}

#[tokio::test]
async fn test_probe_unreachable_endpoint() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = api_for(format!("http://{addr}"));

    let err = api.probe().await.unwrap_err();
    assert!(matches!(err, ApiError::Connect | ApiError::Transport(_)));
}
