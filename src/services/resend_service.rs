use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use serde_json::{json, Value};

use crate::config;
use crate::models::app_config::ProviderKind;
use crate::models::message::{EmailMessage, SendResult};
use crate::services::email_provider::EmailProvider;
use crate::services::secrets::SecretStore;

/// Transactional-API sender. Requires a pre-configured `RESEND_API_KEY`;
/// without it every send fails immediately with a configuration error and no
/// network call is made.
pub struct ResendClient {
    secrets: Arc<SecretStore>,
    client: reqwest::Client,
}

impl ResendClient {
    pub fn new(secrets: Arc<SecretStore>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Unable to build HTTP client for Resend");
        ResendClient { secrets, client }
    }
}

#[async_trait]
impl EmailProvider for ResendClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Resend
    }

    fn is_configured(&self) -> bool {
        self.secrets.get(config::RESEND_API_KEY_VAR).is_some()
    }

    async fn send_one(&self, message: &EmailMessage) -> SendResult {
        let Some(api_key) = self.secrets.get(config::RESEND_API_KEY_VAR) else {
            return SendResult::failed("RESEND_API_KEY is not configured");
        };

        let from = message
            .from
            .clone()
            .unwrap_or_else(|| config::DEFAULT_FROM_ADDRESS.to_string());
        let mut payload = json!({
            "from": from,
            "to": [message.to],
            "subject": message.subject,
            "html": message.body,
        });
        if let Some(reply_to) = &message.reply_to {
            payload["reply_to"] = json!(reply_to);
        }

        debug!("Sending '{}' to {} via Resend", message.subject, message.to);
        let response = self
            .client
            .post(config::resend_api_url())
            .bearer_auth(&api_key)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                let message_id = res
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from));
                SendResult::ok(message_id)
            }
            Ok(res) => {
                let status = res.status();
                let detail = res.text().await.unwrap_or_default();
                error!("Resend rejected message to {}: {} {}", message.to, status, detail);
                SendResult::failed(format!("Resend API returned {}: {}", status, detail))
            }
            Err(e) => {
                error!("Resend request failed for {}: {}", message.to, e);
                SendResult::failed(format!("Resend request failed: {}", e))
            }
        }
    }
}
