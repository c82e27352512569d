use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::services::email_provider::EmailError;

/// Client-side persistence for the linked-account grant. The client copy is
/// authoritative and outlives the server's session copy.
pub trait GrantStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, grant_id: &str) -> Result<(), EmailError>;
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrantCache {
    grant_id: String,
}

/// Grant cache persisted as a small JSON file next to the process.
pub struct FileGrantStore {
    path: PathBuf,
}

impl FileGrantStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileGrantStore { path: path.into() }
    }
}

impl GrantStore for FileGrantStore {
    fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let cache: GrantCache = serde_json::from_str(&raw).ok()?;
        if cache.grant_id.is_empty() {
            None
        } else {
            Some(cache.grant_id)
        }
    }

    fn store(&self, grant_id: &str) -> Result<(), EmailError> {
        let cache = GrantCache {
            grant_id: grant_id.to_string(),
        };
        fs::write(&self.path, serde_json::to_string(&cache)?)?;
        Ok(())
    }
}

/// In-memory grant store for tests and embedded use.
pub struct MemoryGrantStore {
    grant: Mutex<Option<String>>,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        MemoryGrantStore {
            grant: Mutex::new(None),
        }
    }

    pub fn with_grant(grant_id: &str) -> Self {
        MemoryGrantStore {
            grant: Mutex::new(Some(grant_id.to_string())),
        }
    }
}

impl Default for MemoryGrantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GrantStore for MemoryGrantStore {
    fn load(&self) -> Option<String> {
        self.grant.lock().unwrap().clone()
    }

    fn store(&self, grant_id: &str) -> Result<(), EmailError> {
        *self.grant.lock().unwrap() = Some(grant_id.to_string());
        Ok(())
    }
}

/// The three grant endpoints the bridge reconciles against.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// The server's last-known grant for this session, if any.
    async fn fetch_grant_id(&self) -> Result<Option<String>, EmailError>;

    /// Whether the server currently considers the session's grant connected.
    async fn connection_status(&self) -> Result<bool, EmailError>;

    /// Instructs the server to adopt `grant_id` into its session state.
    async fn restore_grant(&self, grant_id: &str) -> Result<(), EmailError>;
}

/// [`SessionApi`] over HTTP. The cookie jar keeps one server session alive
/// across the bridge's calls.
pub struct HttpSessionApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSessionApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Unable to build HTTP client for session bridge");
        HttpSessionApi {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn fetch_grant_id(&self) -> Result<Option<String>, EmailError> {
        let url = format!("{}/api/nylas/grant-id", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EmailError::Transport(format!(
                "grant-id endpoint returned {}",
                response.status()
            )));
        }
        let body: serde_json::Value = response.json().await?;
        Ok(body
            .get("grantId")
            .and_then(|g| g.as_str())
            .filter(|g| !g.is_empty())
            .map(String::from))
    }

    async fn connection_status(&self) -> Result<bool, EmailError> {
        let url = format!("{}/api/nylas/connection-status", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EmailError::Transport(format!(
                "connection-status endpoint returned {}",
                response.status()
            )));
        }
        let body: serde_json::Value = response.json().await?;
        Ok(body.get("connected").and_then(|c| c.as_bool()).unwrap_or(false))
    }

    async fn restore_grant(&self, grant_id: &str) -> Result<(), EmailError> {
        let url = format!("{}/api/nylas/set-grant-id", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "grantId": grant_id }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(EmailError::Transport(format!(
                "set-grant-id endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Reconciles the client-held grant with the server's session copy.
///
/// The client copy survives server session expiry; `ensure_session` detects
/// the divergence and restores the grant into the server session. Calling it
/// again once reconciled performs only the status check.
pub struct SessionBridge {
    grants: Arc<dyn GrantStore>,
    api: Arc<dyn SessionApi>,
}

impl SessionBridge {
    pub fn new(grants: Arc<dyn GrantStore>, api: Arc<dyn SessionApi>) -> Self {
        SessionBridge { grants, api }
    }

    /// At most three round trips: grant fetch, status check, restore. One
    /// round trip when already reconciled.
    pub async fn ensure_session(&self) -> Result<(), EmailError> {
        let grant = match self.grants.load() {
            Some(grant) => grant,
            None => match self.api.fetch_grant_id().await? {
                Some(grant) => {
                    debug!("Adopted server grant into local storage");
                    self.grants.store(&grant)?;
                    grant
                }
                None => {
                    debug!("No grant on client or server, account-linked sending unavailable");
                    return Ok(());
                }
            },
        };

        if self.api.connection_status().await? {
            return Ok(());
        }

        info!("Server session lost its grant, restoring");
        self.api.restore_grant(&grant).await
    }
}
