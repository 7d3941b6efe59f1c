pub mod context;
pub mod llm;
pub mod session;
pub mod store;

pub use context::{build_context, build_system_prompt};
pub use llm::{CompletionClient, OpenAiClient};
pub use session::{ConversationSummary, Reply, SessionManager};
pub use store::ConversationStore;
