use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::chat::{ConversationStore, OpenAiClient, SessionManager};
use crate::config::Config;
use crate::integrations::{GitHubClient, WebhookVerifier};
use crate::logging::init_logging;
use crate::web::{build_router, AppState};

/// 由配置构建共享状态
pub fn build_state(config: &Config) -> AppState {
    let store = Arc::new(ConversationStore::new());
    let client = Arc::new(OpenAiClient::new(config.openai.clone()));
    let sessions = SessionManager::new(store, client, &config.openai.model);

    AppState {
        sessions: Arc::new(sessions),
        github: Arc::new(GitHubClient::new(&config.github)),
        webhook: Arc::new(WebhookVerifier::new(config.github.webhook_secret.clone())),
    }
}

/// 加载配置并启动 HTTP 服务
pub async fn run_server() -> Result<()> {
    let config = Config::load_default().context("加载配置失败")?;
    init_logging(&config.log);

    let state = build_state(&config);
    if !state.sessions.completion_configured() {
        warn!("OPENAI_API_KEY is not set, chat completions will fail");
    }

    let app = build_router(state, &config.server.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败：{}", addr))?;

    info!(%addr, model = %config.openai.model, debug = config.server.debug, "reckie listening");
    axum::serve(listener, app).await.context("HTTP 服务异常退出")?;

    Ok(())
}
