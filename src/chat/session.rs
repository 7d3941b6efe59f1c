use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::ChatResult;
use crate::types::{AdditionalContext, Role, Turn};

use super::context::{build_context, build_system_prompt};
use super::llm::CompletionClient;
use super::store::ConversationStore;

/// 转录中单条内容的最大显示长度
const TRANSCRIPT_PREVIEW: usize = 100;

/// 一次消息交换的结果
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub conversation_id: String,
    pub message_id: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// 对话摘要
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub document_id: Option<String>,
    pub document_type: Option<String>,
}

/// 会话管理器
pub struct SessionManager {
    store: Arc<ConversationStore>,
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl SessionManager {
    pub fn new(store: Arc<ConversationStore>, client: Arc<dyn CompletionClient>, model: &str) -> Self {
        SessionManager {
            store,
            client,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn completion_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// 创建新对话
    pub fn start(
        &self,
        user_id: &str,
        document_id: Option<String>,
        document_type: Option<String>,
    ) -> String {
        let prompt = build_system_prompt(document_type.as_deref());
        let seed = Turn::seed(&prompt, user_id, document_id, document_type);
        let conversation_id = self.store.create(seed);

        info!(%conversation_id, user_id, "started conversation");
        conversation_id
    }

    /// 发送用户消息并获取助手回复
    ///
    /// 补全失败时先记录一条 `error` 系统消息，再把错误返回给调用方。
    /// 调用上游期间不持有任何存储锁。
    pub async fn send(
        &self,
        conversation_id: &str,
        user_id: &str,
        message: &str,
        additional: Option<AdditionalContext>,
    ) -> ChatResult<Reply> {
        let extra = additional.clone();
        self.store
            .append(conversation_id, Turn::user(message, user_id, additional))?;
        info!(conversation_id, "user message logged");

        let turns = self.store.get(conversation_id)?;
        let context = build_context(&turns, extra.as_ref());

        match self.client.generate(message, &self.model, Some(&context)).await {
            Ok(response) => {
                let turn = Turn::assistant(&response, user_id, &self.model);
                let stored = self.store.append(conversation_id, turn)?;
                info!(conversation_id, message_id = %stored.id, "assistant response logged");

                Ok(Reply {
                    conversation_id: conversation_id.to_string(),
                    message_id: stored.id,
                    response,
                    timestamp: stored.timestamp,
                })
            }
            Err(err) => {
                error!(conversation_id, error = %err, "completion failed");
                self.store
                    .append(conversation_id, Turn::failure(err.detail(), user_id))?;
                Err(err)
            }
        }
    }

    /// 对话历史，默认过滤系统消息
    pub fn history(&self, conversation_id: &str, include_system: bool) -> ChatResult<Vec<Turn>> {
        let mut turns = self.store.get(conversation_id)?;
        if !include_system {
            turns.retain(|t| t.role != Role::System);
        }
        Ok(turns)
    }

    pub fn summary(&self, conversation_id: &str) -> ChatResult<ConversationSummary> {
        let turns = self.store.get(conversation_id)?;
        let count = |role: Role| turns.iter().filter(|t| t.role == role).count();

        // 对话创建时总有一条系统消息
        let seed = &turns[0];
        let last = &turns[turns.len() - 1];

        Ok(ConversationSummary {
            conversation_id: conversation_id.to_string(),
            total_messages: turns.len(),
            user_messages: count(Role::User),
            assistant_messages: count(Role::Assistant),
            started_at: seed.timestamp,
            last_activity: last.timestamp,
            document_id: seed.document_id.clone(),
            document_type: seed.document_type.clone(),
        })
    }

    /// 可读的对话记录，每条内容截断到 100 个字符
    pub fn transcript(&self, conversation_id: &str) -> Option<String> {
        let turns = self.store.get(conversation_id).ok()?;

        let mut lines = vec![format!("=== Conversation Log: {} ===", conversation_id)];
        for turn in &turns {
            lines.push(format!(
                "[{}] {}: {}",
                turn.timestamp.to_rfc3339(),
                turn.role.as_str().to_uppercase(),
                preview(&turn.content)
            ));
        }
        lines.push("=== End Conversation Log ===".to_string());

        Some(lines.join("\n"))
    }

    /// 以 debug 级别输出对话记录
    pub fn log_transcript(&self, conversation_id: &str) {
        match self.transcript(conversation_id) {
            Some(transcript) => debug!("\n{}", transcript),
            None => warn!(conversation_id, "conversation not found for logging"),
        }
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() > TRANSCRIPT_PREVIEW {
        let head: String = content.chars().take(TRANSCRIPT_PREVIEW).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}
