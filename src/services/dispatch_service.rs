use std::sync::Arc;

use log::{debug, info, warn};

use crate::models::app_config::ProviderKind;
use crate::models::message::{BatchSendResult, EmailMessage};
use crate::services::config_store::ConfigStore;
use crate::services::email_provider::EmailProvider;
use crate::services::session_bridge::SessionBridge;

/// Chooses an email backend per the current configuration and hands the
/// batch to it, falling back to the mock mailer when the selected backend is
/// unconfigured.
pub struct Dispatcher {
    config: Arc<ConfigStore>,
    bridge: Arc<SessionBridge>,
    resend: Arc<dyn EmailProvider>,
    nylas: Arc<dyn EmailProvider>,
    fallback: Arc<dyn EmailProvider>,
}

impl Dispatcher {
    pub fn new(
        config: Arc<ConfigStore>,
        bridge: Arc<SessionBridge>,
        resend: Arc<dyn EmailProvider>,
        nylas: Arc<dyn EmailProvider>,
        fallback: Arc<dyn EmailProvider>,
    ) -> Self {
        Dispatcher {
            config,
            bridge,
            resend,
            nylas,
            fallback,
        }
    }

    fn client_for(&self, kind: ProviderKind) -> Arc<dyn EmailProvider> {
        match kind {
            ProviderKind::Resend => Arc::clone(&self.resend),
            ProviderKind::Nylas => Arc::clone(&self.nylas),
            ProviderKind::Fallback => Arc::clone(&self.fallback),
        }
    }

    /// Unified send operation exposed to the rest of the application.
    ///
    /// For the account-linked backend the session is reconciled first,
    /// best-effort: a bridge failure is logged and the send proceeds so the
    /// provider client surfaces the real error.
    pub async fn dispatch_send(&self, messages: &[EmailMessage]) -> BatchSendResult {
        let selected = self.config.get().email_service.provider;

        if selected == ProviderKind::Nylas {
            if let Err(e) = self.bridge.ensure_session().await {
                warn!("Session reconciliation failed before send: {}", e);
            }
        }

        let mut provider = self.client_for(selected);
        if !provider.is_configured() {
            info!(
                "Email provider {} is not configured, using the fallback mailer",
                selected
            );
            provider = Arc::clone(&self.fallback);
        }

        debug!(
            "Dispatching {} message(s) via {}",
            messages.len(),
            provider.kind()
        );
        provider.send_batch(messages).await
    }
}
