use reqwest::Client;
use serde_json::Value;

use crate::config::GitHubConfig;
use crate::error::{ChatError, ChatResult};

const ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub REST API 客户端
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Self {
        let client = Client::builder()
            .user_agent(concat!("reckie/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        GitHubClient {
            client,
            token: config.token.clone().filter(|t| !t.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// 当前 token 对应的用户信息
    pub async fn user_info(&self) -> ChatResult<Value> {
        self.get("user").await
    }

    pub async fn repository_info(&self, owner: &str, repo: &str) -> ChatResult<Value> {
        self.get(&format!("repos/{}/{}", owner, repo)).await
    }

    async fn get(&self, path: &str) -> ChatResult<Value> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ChatError::NotConfigured("GitHub token".to_string()))?;

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Upstream(format!("GitHub API 错误：{} - {}", status, text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| ChatError::Upstream(format!("解析 GitHub 响应失败：{}", e)))
    }
}
