use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::error::{ChatError, ChatResult};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelList};

/// 文本补全接口
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 单次调用，不重试
    async fn generate(&self, prompt: &str, model: &str, context: Option<&str>) -> ChatResult<String>;

    /// 是否配置了凭据
    fn is_configured(&self) -> bool {
        true
    }
}

/// OpenAI chat completions 客户端
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        OpenAiClient { client, config }
    }

    fn api_key(&self) -> ChatResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ChatError::NotConfigured("OpenAI API key".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// 可用模型 id 列表
    pub async fn list_models(&self) -> ChatResult<Vec<String>> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(self.url("models"))
            .bearer_auth(api_key)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Upstream(format!("OpenAI API 错误：{} - {}", status, text)));
        }

        let models: ModelList = serde_json::from_str(&text)
            .map_err(|e| ChatError::Upstream(format!("解析模型列表失败：{}", e)))?;

        Ok(models.data.into_iter().map(|m| m.id).collect())
    }
}

/// 构建请求消息：可选的系统上下文在前，用户消息在后
pub fn build_messages(prompt: &str, context: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        messages.push(ChatMessage::system(context));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn generate(&self, prompt: &str, model: &str, context: Option<&str>) -> ChatResult<String> {
        let api_key = self.api_key()?;

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: build_messages(prompt, context),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Upstream(format!("OpenAI API 错误：{} - {}", status, text)));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ChatError::Upstream(format!("解析 OpenAI 响应失败：{}", e)))?;

        completion
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| ChatError::Upstream("OpenAI 响应中没有回复内容".to_string()))
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }
}
