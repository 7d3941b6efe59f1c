use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// 文档类型，决定系统提示的补充说明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Vision,
    Requirements,
    UserStory,
}

impl DocumentType {
    /// 未识别的标签返回 None
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "vision" => Some(DocumentType::Vision),
            "requirements" => Some(DocumentType::Requirements),
            "user_story" => Some(DocumentType::UserStory),
            _ => None,
        }
    }
}

/// 随用户消息附带的额外上下文
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_context: Option<String>,
}

impl AdditionalContext {
    pub fn is_empty(&self) -> bool {
        self.document_content.is_none() && self.project_context.is_none()
    }
}

/// 对话中的一条消息，追加后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub content: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<AdditionalContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl Turn {
    fn new(role: Role, content: &str, user_id: &str) -> Self {
        Turn {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            role,
            content: content.to_string(),
            user_id: user_id.to_string(),
            document_id: None,
            document_type: None,
            context: None,
            model: None,
            error: false,
        }
    }

    /// 对话的首条系统消息，携带文档元数据
    pub fn seed(
        prompt: &str,
        user_id: &str,
        document_id: Option<String>,
        document_type: Option<String>,
    ) -> Self {
        Turn {
            document_id,
            document_type,
            ..Turn::new(Role::System, prompt, user_id)
        }
    }

    pub fn user(content: &str, user_id: &str, context: Option<AdditionalContext>) -> Self {
        Turn {
            context: context.filter(|c| !c.is_empty()),
            ..Turn::new(Role::User, content, user_id)
        }
    }

    pub fn assistant(content: &str, user_id: &str, model: &str) -> Self {
        Turn {
            model: Some(model.to_string()),
            ..Turn::new(Role::Assistant, content, user_id)
        }
    }

    /// 记录补全失败的系统消息
    pub fn failure(message: &str, user_id: &str) -> Self {
        Turn {
            error: true,
            ..Turn::new(Role::System, &format!("Error: {}", message), user_id)
        }
    }

    /// 是否参与上下文窗口
    pub fn is_dialogue(&self) -> bool {
        matches!(self.role, Role::User | Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_tags() {
        assert_eq!(DocumentType::from_tag("vision"), Some(DocumentType::Vision));
        assert_eq!(DocumentType::from_tag("user_story"), Some(DocumentType::UserStory));
        assert_eq!(DocumentType::from_tag("Vision"), None);
        assert_eq!(DocumentType::from_tag(""), None);
    }

    #[test]
    fn test_turn_serialization_skips_absent_fields() {
        let turn = Turn::assistant("hi", "u1", "gpt-3.5-turbo");
        let value = serde_json::to_value(&turn).unwrap();

        assert_eq!(value["role"], "assistant");
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert!(value.get("error").is_none());
        assert!(value.get("document_id").is_none());

        let failure = Turn::failure("boom", "u1");
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["error"], true);
        assert_eq!(value["content"], "Error: boom");
    }

    #[test]
    fn test_user_turn_drops_empty_context() {
        let turn = Turn::user("hello", "u1", Some(AdditionalContext::default()));
        assert!(turn.context.is_none());
        assert!(turn.is_dialogue());
    }
}
