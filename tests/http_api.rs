//! Integration tests for the HTTP routes.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use reckie::chat::OpenAiClient;
use reckie::config::{GitHubConfig, OpenAiConfig};
use reckie::integrations::webhook::sign;
use reckie::integrations::{GitHubClient, WebhookVerifier};
use reckie::web::{build_router, AppState};
use reckie::{ChatError, ChatResult, CompletionClient, ConversationStore, SessionManager};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// 固定回复或固定失败的补全客户端
struct StubClient {
    reply: Option<&'static str>,
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn generate(&self, _prompt: &str, _model: &str, _context: Option<&str>) -> ChatResult<String> {
        match self.reply {
            Some(text) => Ok(text.to_string()),
            None => Err(ChatError::Upstream("OpenAI API 错误：500".to_string())),
        }
    }
}

fn create_app(reply: Option<&'static str>, webhook_secret: Option<&str>) -> axum::Router {
    create_app_with(Arc::new(StubClient { reply }), webhook_secret)
}

fn create_app_with(client: Arc<dyn CompletionClient>, webhook_secret: Option<&str>) -> axum::Router {
    let store = Arc::new(ConversationStore::new());
    let sessions = SessionManager::new(store, client, "gpt-3.5-turbo");

    let state = AppState {
        sessions: Arc::new(sessions),
        github: Arc::new(GitHubClient::new(&GitHubConfig::default())),
        webhook: Arc::new(WebhookVerifier::new(webhook_secret.map(str::to_string))),
    };
    build_router(state, Path::new("static"))
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

async fn post_form(app: &axum::Router, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
    let body = serde_urlencoded::to_string(fields).unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

async fn start(app: &axum::Router, document_type: &str) -> String {
    let (status, json) = post_form(
        app,
        "/chat/start",
        &[("user_id", "u1"), ("document_type", document_type)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    json["conversation_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_status() {
    let app = create_app(Some("ok"), None);

    let (status, json) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());

    let (status, json) = get(&app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "operational");
    assert_eq!(json["service"], "reckie-api");
}

#[tokio::test]
async fn test_dashboard_is_html() {
    let app = create_app(Some("ok"), None);
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("Hello World from Reckie!"));
}

#[tokio::test]
async fn test_conversation_flow() {
    let app = create_app(Some("Use Given/When/Then."), None);
    let id = start(&app, "requirements").await;

    let (status, json) = post_form(
        &app,
        "/chat/send",
        &[
            ("conversation_id", id.as_str()),
            ("user_id", "u1"),
            ("message", "  What is the acceptance criteria format?  "),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Use Given/When/Then.");
    assert!(json["message_id"].is_string());

    let (status, json) = get(&app, &format!("/chat/history/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "What is the acceptance criteria format?");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["model"], "gpt-3.5-turbo");
    assert_eq!(json["summary"]["total_messages"], 3);
    assert_eq!(json["summary"]["user_messages"], 1);
    assert_eq!(json["summary"]["assistant_messages"], 1);
    assert_eq!(json["summary"]["document_type"], "requirements");

    let (_, json) = get(&app, &format!("/chat/history/{}?include_system=true", id)).await;
    assert_eq!(json["messages"].as_array().unwrap().len(), 3);
    assert_eq!(json["messages"][0]["role"], "system");
}

#[tokio::test]
async fn test_send_validation() {
    let app = create_app(Some("ok"), None);
    let id = start(&app, "").await;

    let (status, json) = post_form(&app, "/chat/send", &[("conversation_id", id.as_str()), ("message", "   ")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_INPUT");

    let long = "a".repeat(2001);
    let (status, json) = post_form(&app, "/chat/send", &[("conversation_id", id.as_str()), ("message", long.as_str())]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "Message too long (max 2000 characters)");

    let (_, json) = get(&app, &format!("/chat/history/{}?include_system=true", id)).await;
    assert_eq!(json["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_conversation_is_404() {
    let app = create_app(Some("ok"), None);

    let (status, json) = post_form(&app, "/chat/send", &[("conversation_id", "nope"), ("message", "hi")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "NOT_FOUND");

    let (status, _) = get(&app, "/chat/history/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upstream_failure_is_recorded() {
    let app = create_app(None, None);
    let id = start(&app, "vision").await;

    let (status, json) = post_form(&app, "/chat/send", &[("conversation_id", id.as_str()), ("message", "hello")]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");

    let (_, json) = get(&app, &format!("/chat/history/{}?include_system=true", id)).await;
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["error"], true);

    let (_, json) = get(&app, &format!("/chat/history/{}", id)).await;
    assert_eq!(json["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_api_key_is_500_and_recorded() {
    let client = Arc::new(OpenAiClient::new(OpenAiConfig::default()));
    let app = create_app_with(client, None);
    let id = start(&app, "").await;

    let (status, json) = post_form(&app, "/chat/send", &[("conversation_id", id.as_str()), ("message", "hello")]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "NOT_CONFIGURED");

    let (_, json) = get(&app, &format!("/chat/history/{}?include_system=true", id)).await;
    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["error"], true);
    assert_eq!(messages[2]["content"], "Error: OpenAI API key");
}

#[tokio::test]
async fn test_echo() {
    let app = create_app(None, None);

    let (status, json) = post_form(&app, "/chat/test/echo", &[("message", " ping ")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Echo: ping");
    assert_eq!(json["mode"], "echo");

    let (status, _) = post_form(&app, "/chat/test/echo", &[("message", "")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_status() {
    let app = create_app(Some("ok"), Some("secret"));
    let (status, json) = get(&app, "/chat/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["services"]["conversation_service"], "operational");
    assert_eq!(json["services"]["openai_service"], "configured");
    assert_eq!(json["services"]["github_service"], "not_configured");
    assert_eq!(json["services"]["webhook_service"], "configured");
    assert_eq!(json["model"], "gpt-3.5-turbo");
}

#[tokio::test]
async fn test_github_routes_require_token() {
    let app = create_app(Some("ok"), None);
    let (status, json) = get(&app, "/api/github/repos/octo/reckie").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "NOT_CONFIGURED");
}

async fn post_webhook(app: &axum::Router, body: &'static str, signature: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhooks/github")
        .header("X-GitHub-Event", "push")
        .header("X-Hub-Signature-256", signature)
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

#[tokio::test]
async fn test_github_webhook_signature() {
    let body = r#"{"ref":"refs/heads/main"}"#;
    let app = create_app(Some("ok"), Some("hook-secret"));

    let signature = sign("hook-secret", body.as_bytes()).unwrap();
    let (status, json) = post_webhook(&app, body, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["event"], "push");

    let (status, json) = post_webhook(&app, body, "sha256=deadbeef").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "INVALID_SIGNATURE");

    let unconfigured = create_app(Some("ok"), None);
    let (status, _) = post_webhook(&unconfigured, body, &signature).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
