use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use log::{error, info};

use crate::config;
use crate::models::app_config::{AppConfig, AppConfigPatch};
use crate::services::email_provider::EmailError;
use crate::services::secrets::SecretStore;

/// File-backed store for the email-service configuration document.
///
/// Reads are fail-open: a missing, unreadable or corrupt file yields the
/// default document so the wizard flow never stalls on configuration.
/// Writes propagate their errors. The in-memory cache is owned by this
/// object and guarded by a single lock, so concurrent updates serialize
/// instead of racing read-modify-write.
pub struct ConfigStore {
    path: PathBuf,
    secrets: Arc<SecretStore>,
    cache: RwLock<Option<AppConfig>>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, secrets: Arc<SecretStore>) -> Self {
        ConfigStore {
            path: path.into(),
            secrets,
            cache: RwLock::new(None),
        }
    }

    pub fn with_default_path(secrets: Arc<SecretStore>) -> Self {
        Self::new(config::CONFIG_FILE, secrets)
    }

    /// Returns the current configuration, loading it from disk on first use.
    pub fn get(&self) -> AppConfig {
        if let Some(cached) = self.cache.read().unwrap().clone() {
            return cached;
        }
        let loaded = self.load_or_default();
        *self.cache.write().unwrap() = Some(loaded.clone());
        loaded
    }

    /// Merges `patch` into the current document, persists the result and
    /// refreshes the cache. API keys carried by the patch are published to
    /// the secret store; only presence flags reach the file.
    pub fn update(&self, patch: &AppConfigPatch) -> Result<AppConfig, EmailError> {
        // Hold the write lock across the whole read-modify-write so
        // concurrent updates cannot interleave.
        let mut cache = self.cache.write().unwrap();
        let mut merged = match cache.clone() {
            Some(current) => current,
            None => self.load_or_default(),
        };
        merged.apply(patch);
        self.persist(&merged)?;
        self.publish_secrets(patch);
        *cache = Some(merged.clone());
        info!("Email service config updated: provider={}", merged.email_service.provider);
        Ok(merged)
    }

    fn load_or_default(&self) -> AppConfig {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<AppConfig>(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    error!(
                        "Config file {} is not valid JSON ({}), using defaults",
                        self.path.display(),
                        e
                    );
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let defaults = AppConfig::default();
                if let Err(e) = self.persist(&defaults) {
                    error!("Failed to write default config file: {}", e);
                }
                defaults
            }
            Err(e) => {
                error!("Failed to read config file {}: {}", self.path.display(), e);
                AppConfig::default()
            }
        }
    }

    fn persist(&self, document: &AppConfig) -> Result<(), EmailError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn publish_secrets(&self, patch: &AppConfigPatch) {
        let Some(service) = &patch.email_service else {
            return;
        };
        if let Some(key) = service.resend.as_ref().and_then(|p| p.api_key.as_deref()) {
            if !key.is_empty() {
                self.secrets.set(config::RESEND_API_KEY_VAR, key);
            }
        }
        if let Some(key) = service.nylas.as_ref().and_then(|p| p.api_key.as_deref()) {
            if !key.is_empty() {
                self.secrets.set(config::NYLAS_API_KEY_VAR, key);
            }
        }
    }
}
