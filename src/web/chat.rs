use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::{ChatError, ChatResult};
use crate::types::AdditionalContext;

use super::AppState;

/// 单条消息的最大字符数
pub const MAX_MESSAGE_CHARS: usize = 2000;

fn default_user() -> String {
    "test_user".to_string()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub struct StartForm {
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendForm {
    pub conversation_id: String,
    pub message: String,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub document_content: Option<String>,
    #[serde(default)]
    pub project_context: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EchoForm {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub include_system: bool,
}

/// 边界校验：去除首尾空白后非空，且原文不超过上限
pub fn validate_message(message: &str) -> ChatResult<&str> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(ChatError::InvalidInput("Message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::InvalidInput(format!(
            "Message too long (max {} characters)",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(trimmed)
}

pub async fn start(State(state): State<AppState>, Form(form): Form<StartForm>) -> Json<Value> {
    let conversation_id = state.sessions.start(
        &form.user_id,
        present(form.document_id),
        present(form.document_type),
    );

    Json(json!({
        "success": true,
        "conversation_id": conversation_id,
        "message": "Conversation started successfully",
    }))
}

pub async fn send(
    State(state): State<AppState>,
    Form(form): Form<SendForm>,
) -> ChatResult<Json<Value>> {
    let message = validate_message(&form.message)?;

    let additional = AdditionalContext {
        document_content: present(form.document_content),
        project_context: present(form.project_context),
    };

    let reply = state
        .sessions
        .send(&form.conversation_id, &form.user_id, message, Some(additional))
        .await
        .inspect_err(|e| {
            error!(conversation_id = %form.conversation_id, error = %e, "error sending message")
        })?;

    state.sessions.log_transcript(&form.conversation_id);

    Ok(Json(json!({
        "success": true,
        "response": reply.response,
        "message_id": reply.message_id,
        "timestamp": reply.timestamp,
    })))
}

pub async fn history(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ChatResult<Json<Value>> {
    let messages = state
        .sessions
        .history(&conversation_id, query.include_system)
        .inspect_err(|e| error!(%conversation_id, error = %e, "error getting history"))?;
    let summary = state.sessions.summary(&conversation_id)?;

    Ok(Json(json!({
        "success": true,
        "conversation_id": conversation_id,
        "messages": messages,
        "summary": summary,
    })))
}

/// 不经过模型的回显，用于连通性测试
pub async fn echo(Form(form): Form<EchoForm>) -> ChatResult<Json<Value>> {
    let message = form.message.trim();
    if message.is_empty() {
        return Err(ChatError::InvalidInput("Message cannot be empty".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "response": format!("Echo: {}", message),
        "timestamp": "test",
        "mode": "echo",
    })))
}

pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let flag = |configured: bool| if configured { "configured" } else { "not_configured" };

    Json(json!({
        "success": true,
        "services": {
            "conversation_service": "operational",
            "openai_service": flag(state.sessions.completion_configured()),
            "github_service": flag(state.github.is_configured()),
            "webhook_service": flag(state.webhook.is_configured()),
        },
        "model": state.sessions.model(),
        "message": "Chat services are operational",
    }))
}
