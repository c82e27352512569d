use std::fmt;

use serde::{Deserialize, Serialize};

/// Which backend outgoing email goes through.
///
/// `Fallback` is a real provider variant, not a dispatch special case: it
/// always accepts messages and fabricates delivery, which keeps the wizard
/// flow alive on installs with no email backend configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Resend,
    Nylas,
    Fallback,
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::Fallback
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Resend => "resend",
            ProviderKind::Nylas => "nylas",
            ProviderKind::Fallback => "fallback",
        };
        write!(f, "{}", name)
    }
}

/// Per-provider state recorded in the config document. Only the presence of
/// a credential is persisted; key material lives in the secret store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderStatus {
    pub credential_present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailServiceConfig {
    pub provider: ProviderKind,
    pub resend: ProviderStatus,
    pub nylas: ProviderStatus,
}

/// The persisted application configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub email_service: EmailServiceConfig,
}

impl AppConfig {
    /// Merges a partial update into this document, key by key. Fields absent
    /// from the patch keep their current value; the nested `emailService`
    /// object is never replaced wholesale.
    pub fn apply(&mut self, patch: &AppConfigPatch) {
        if let Some(service) = &patch.email_service {
            if let Some(provider) = service.provider {
                self.email_service.provider = provider;
            }
            apply_provider_patch(&mut self.email_service.resend, service.resend.as_ref());
            apply_provider_patch(&mut self.email_service.nylas, service.nylas.as_ref());
        }
    }
}

fn apply_provider_patch(status: &mut ProviderStatus, patch: Option<&ProviderPatch>) {
    if let Some(patch) = patch {
        if let Some(present) = patch.credential_present {
            status.credential_present = present;
        }
        if patch.api_key.as_ref().is_some_and(|k| !k.is_empty()) {
            status.credential_present = true;
        }
    }
}

/// A partial configuration update. `api_key` values are forwarded to the
/// secret store by the config store and never written to disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfigPatch {
    pub email_service: Option<EmailServicePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailServicePatch {
    pub provider: Option<ProviderKind>,
    pub resend: Option<ProviderPatch>,
    pub nylas: Option<ProviderPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderPatch {
    pub api_key: Option<String>,
    pub credential_present: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_wire_shape() {
        let json = serde_json::to_string(&AppConfig::default()).unwrap();
        assert!(json.contains("\"emailService\""));
        assert!(json.contains("\"provider\":\"fallback\""));
        assert!(json.contains("\"credentialPresent\":false"));
    }

    #[test]
    fn patch_does_not_clobber_siblings() {
        let mut config = AppConfig::default();
        config.email_service.provider = ProviderKind::Nylas;
        config.email_service.nylas.credential_present = true;

        let patch: AppConfigPatch = serde_json::from_str(
            r#"{"emailService":{"resend":{"credentialPresent":true}}}"#,
        )
        .unwrap();
        config.apply(&patch);

        assert_eq!(config.email_service.provider, ProviderKind::Nylas);
        assert!(config.email_service.nylas.credential_present);
        assert!(config.email_service.resend.credential_present);
    }

    #[test]
    fn api_key_in_patch_marks_credential_present() {
        let mut config = AppConfig::default();
        let patch: AppConfigPatch = serde_json::from_str(
            r#"{"emailService":{"resend":{"apiKey":"re_secret"}}}"#,
        )
        .unwrap();
        config.apply(&patch);
        assert!(config.email_service.resend.credential_present);
    }

    #[test]
    fn empty_api_key_does_not_mark_credential_present() {
        let mut config = AppConfig::default();
        let patch: AppConfigPatch =
            serde_json::from_str(r#"{"emailService":{"resend":{"apiKey":""}}}"#).unwrap();
        config.apply(&patch);
        assert!(!config.email_service.resend.credential_present);
    }

    #[test]
    fn provider_switch_applies() {
        let mut config = AppConfig::default();
        let patch: AppConfigPatch =
            serde_json::from_str(r#"{"emailService":{"provider":"resend"}}"#).unwrap();
        config.apply(&patch);
        assert_eq!(config.email_service.provider, ProviderKind::Resend);
    }
}
