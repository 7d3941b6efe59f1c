mod openai;
mod turn;

pub use openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelList};
pub use turn::{AdditionalContext, DocumentType, Role, Turn};
