use async_trait::async_trait;
use futures::future::join_all;

use crate::models::app_config::ProviderKind;
use crate::models::message::{BatchSendResult, EmailMessage, SendResult};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// A credential or grant is missing. Expected on unconfigured installs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A grant is present but the provider rejected it.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The underlying network call or API failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The config or grant file could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<reqwest::Error> for EmailError {
    fn from(error: reqwest::Error) -> Self {
        EmailError::Transport(error.to_string())
    }
}

impl From<std::io::Error> for EmailError {
    fn from(error: std::io::Error) -> Self {
        EmailError::Persistence(error.to_string())
    }
}

impl From<serde_json::Error> for EmailError {
    fn from(error: serde_json::Error) -> Self {
        EmailError::Persistence(error.to_string())
    }
}

/// Uniform send contract shared by every email backend, including the
/// synthetic fallback mailer.
///
/// `send_one` never propagates an error: all failures are captured into the
/// returned [`SendResult`] so the dispatch layer and UI can show partial
/// outcomes.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether this client has everything it needs to attempt a send.
    fn is_configured(&self) -> bool;

    async fn send_one(&self, message: &EmailMessage) -> SendResult;

    /// Sends every message concurrently and waits for all of them to settle.
    /// No ordering between messages, no cancellation once started.
    async fn send_batch(&self, messages: &[EmailMessage]) -> BatchSendResult {
        let results = join_all(messages.iter().map(|m| self.send_one(m))).await;
        BatchSendResult::from_results(results)
    }
}
