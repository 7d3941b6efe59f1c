pub mod chat;
pub mod config;
pub mod error;
pub mod integrations;
pub mod logging;
pub mod server;
pub mod types;
pub mod web;

pub use chat::{CompletionClient, ConversationStore, SessionManager};
pub use config::Config;
pub use error::{ChatError, ChatResult};
pub use server::run_server;
