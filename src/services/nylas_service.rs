use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use serde_json::{json, Value};

use crate::config;
use crate::models::app_config::ProviderKind;
use crate::models::message::{EmailMessage, SendResult};
use crate::services::email_provider::{EmailError, EmailProvider};
use crate::services::secrets::SecretStore;
use crate::services::session_bridge::GrantStore;

/// Account-linked sender. Sends through the user's own mailbox, identified
/// by the grant in the shared grant store. Without a grant (or the service
/// API key) every send fails immediately and no network call is made.
pub struct NylasClient {
    secrets: Arc<SecretStore>,
    grants: Arc<dyn GrantStore>,
    client: reqwest::Client,
}

impl NylasClient {
    pub fn new(secrets: Arc<SecretStore>, grants: Arc<dyn GrantStore>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Unable to build HTTP client for Nylas");
        NylasClient {
            secrets,
            grants,
            client,
        }
    }

    fn api_key(&self) -> Option<String> {
        self.secrets.get(config::NYLAS_API_KEY_VAR)
    }

    /// Lightweight check that the given grant is still valid upstream.
    ///
    /// Used by the connection-status endpoint. A 401/403/404 means the grant
    /// is no longer usable; other API errors surface as transport failures.
    pub async fn verify_grant(&self, grant_id: &str) -> Result<bool, EmailError> {
        let Some(api_key) = self.api_key() else {
            return Err(EmailError::Configuration(
                "NYLAS_API_KEY is not configured".to_string(),
            ));
        };
        let url = format!("{}/grants/{}", config::nylas_api_url(), grant_id);
        let response = self.client.get(&url).bearer_auth(&api_key).send().await?;
        if response.status().is_success() {
            return Ok(true);
        }
        info!("Nylas reports grant as not connected: {}", response.status());
        Ok(false)
    }
}

#[async_trait]
impl EmailProvider for NylasClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Nylas
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_some() && self.grants.load().is_some()
    }

    async fn send_one(&self, message: &EmailMessage) -> SendResult {
        let Some(grant_id) = self.grants.load() else {
            return SendResult::failed("No linked email account grant for this session");
        };
        let Some(api_key) = self.api_key() else {
            return SendResult::failed("NYLAS_API_KEY is not configured");
        };

        let mut payload = json!({
            "subject": message.subject,
            "body": message.body,
            "to": [{ "email": message.to }],
        });
        if let Some(reply_to) = &message.reply_to {
            payload["reply_to"] = json!([{ "email": reply_to }]);
        }
        if let Some(from) = &message.from {
            payload["from"] = json!([{ "email": from }]);
        }

        let url = format!(
            "{}/grants/{}/messages/send",
            config::nylas_api_url(),
            grant_id
        );
        debug!("Sending '{}' to {} via Nylas", message.subject, message.to);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&api_key)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                let message_id = res.json::<Value>().await.ok().and_then(|v| {
                    v.get("data")
                        .and_then(|d| d.get("id"))
                        .and_then(|id| id.as_str())
                        .map(String::from)
                });
                SendResult::ok(message_id)
            }
            Ok(res) if res.status().as_u16() == 401 || res.status().as_u16() == 403 => {
                error!("Nylas rejected the grant while sending to {}", message.to);
                SendResult::failed(format!("Nylas rejected the grant: {}", res.status()))
            }
            Ok(res) => {
                let status = res.status();
                let detail = res.text().await.unwrap_or_default();
                error!("Nylas send to {} failed: {} {}", message.to, status, detail);
                SendResult::failed(format!("Nylas API returned {}: {}", status, detail))
            }
            Err(e) => {
                error!("Nylas request failed for {}: {}", message.to, e);
                SendResult::failed(format!("Nylas request failed: {}", e))
            }
        }
    }
}
