use async_trait::async_trait;
use log::info;
use uuid::Uuid;

use crate::models::app_config::ProviderKind;
use crate::models::message::{EmailMessage, SendResult};
use crate::services::email_provider::EmailProvider;

/// The synthetic fallback mailer: accepts every message and fabricates a
/// delivery id. Nothing is actually sent. Dispatch selects it when no real
/// backend is configured so the wizard flow completes during local testing
/// and demos.
pub struct MockMailer;

#[async_trait]
impl EmailProvider for MockMailer {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Fallback
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send_one(&self, message: &EmailMessage) -> SendResult {
        info!(
            "Mock delivery of '{}' to {} (no real email sent)",
            message.subject, message.to
        );
        SendResult::ok(Some(format!("mock-{}", Uuid::new_v4())))
    }
}
