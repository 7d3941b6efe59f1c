use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ChatResult;

use super::AppState;

const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const EVENT_HEADER: &str = "x-github-event";

pub async fn user(State(state): State<AppState>) -> ChatResult<Json<Value>> {
    let user = state.github.user_info().await?;
    Ok(Json(user))
}

pub async fn repository(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> ChatResult<Json<Value>> {
    let repository = state.github.repository_info(&owner, &repo).await?;
    Ok(Json(repository))
}

/// 接收 GitHub webhook，签名不符返回 401
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ChatResult<Response> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let signature = header(SIGNATURE_HEADER);
    let event = header(EVENT_HEADER);

    if !state.webhook.verify(&body, &signature)? {
        warn!(%event, "rejected webhook with invalid signature");
        let body = json!({
            "success": false,
            "error": { "code": "INVALID_SIGNATURE", "message": "Invalid webhook signature" },
        });
        return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
    }

    info!(%event, bytes = body.len(), "accepted webhook");
    Ok(Json(json!({ "success": true, "event": event })).into_response())
}
