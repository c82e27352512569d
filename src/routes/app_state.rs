use std::sync::Arc;

use crate::services::config_store::ConfigStore;
use crate::services::dispatch_service::Dispatcher;
use crate::services::nylas_service::NylasClient;
use crate::services::session_bridge::GrantStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub grants: Arc<dyn GrantStore>,
    pub nylas: Arc<NylasClient>,
}
