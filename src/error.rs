use thiserror::Error;

/// 对话服务的错误类型
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Conversation {0} not found")]
    NotFound(String),

    #[error("{0} not configured")]
    NotConfigured(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl ChatError {
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::NotFound(_) => "NOT_FOUND",
            ChatError::NotConfigured(_) => "NOT_CONFIGURED",
            ChatError::Upstream(_) => "UPSTREAM_ERROR",
            ChatError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// 不带分类前缀的错误内容
    pub fn detail(&self) -> &str {
        match self {
            ChatError::NotFound(s)
            | ChatError::NotConfigured(s)
            | ChatError::Upstream(s)
            | ChatError::InvalidInput(s) => s,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Upstream(err.to_string())
    }
}

pub type ChatResult<T> = std::result::Result<T, ChatError>;
