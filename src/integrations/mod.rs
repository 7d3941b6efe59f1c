pub mod github;
pub mod webhook;

pub use github::GitHubClient;
pub use webhook::WebhookVerifier;
