pub mod chat;
pub mod error;
pub mod github;
pub mod pages;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::chat::SessionManager;
use crate::integrations::{GitHubClient, WebhookVerifier};

/// 请求处理共享的状态，启动时构建一次
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub github: Arc<GitHubClient>,
    pub webhook: Arc<WebhookVerifier>,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") }))
}

async fn api_status() -> Json<Value> {
    Json(json!({ "status": "operational", "service": "reckie-api" }))
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/health", get(health))
        .route("/api/status", get(api_status))
        .route("/chat", get(pages::chat))
        .route("/chat/test", get(pages::chat_test))
        .route("/chat/start", post(chat::start))
        .route("/chat/send", post(chat::send))
        .route("/chat/history/:conversation_id", get(chat::history))
        .route("/chat/test/echo", post(chat::echo))
        .route("/chat/status", get(chat::status))
        .route("/api/github/user", get(github::user))
        .route("/api/github/repos/:owner/:repo", get(github::repository))
        .route("/webhooks/github", post(github::webhook))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
