use std::sync::Arc;

use actix_files::Files;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{middleware::Logger, web, App, HttpServer};

use CareOutreachAgent::config;
use CareOutreachAgent::memory_session_store::MemorySessionStore;
use CareOutreachAgent::routes;
use CareOutreachAgent::routes::app_state::AppState;
use CareOutreachAgent::services::config_store::ConfigStore;
use CareOutreachAgent::services::dispatch_service::Dispatcher;
use CareOutreachAgent::services::email_provider::EmailProvider;
use CareOutreachAgent::services::mock_service::MockMailer;
use CareOutreachAgent::services::nylas_service::NylasClient;
use CareOutreachAgent::services::resend_service::ResendClient;
use CareOutreachAgent::services::secrets::SecretStore;
use CareOutreachAgent::services::session_bridge::{
    FileGrantStore, GrantStore, HttpSessionApi, SessionBridge,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    config::init_logging();

    let secrets = Arc::new(SecretStore::new());
    let config_store = Arc::new(ConfigStore::with_default_path(Arc::clone(&secrets)));
    let grants: Arc<dyn GrantStore> = Arc::new(FileGrantStore::new(config::GRANT_CACHE_FILE));

    let session_api = Arc::new(HttpSessionApi::new(config::session_api_base()));
    let bridge = Arc::new(SessionBridge::new(Arc::clone(&grants), session_api));

    let nylas = Arc::new(NylasClient::new(Arc::clone(&secrets), Arc::clone(&grants)));
    let resend: Arc<dyn EmailProvider> = Arc::new(ResendClient::new(Arc::clone(&secrets)));
    let fallback: Arc<dyn EmailProvider> = Arc::new(MockMailer);

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&config_store),
        bridge,
        resend,
        Arc::clone(&nylas) as Arc<dyn EmailProvider>,
        fallback,
    ));

    let state = AppState {
        config: config_store,
        dispatcher,
        grants,
        nylas,
    };

    let session_store = MemorySessionStore::new();
    let session_key = Key::generate();

    log::info!(
        "Starting server on http://{}:{}",
        config::server_host(),
        config::server_port()
    );
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                SessionMiddleware::builder(session_store.clone(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(web::Data::new(state.clone()))
            .configure(routes::grant_routes::init_routes)
            .configure(routes::email_routes::init_routes)
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .bind((config::server_host(), config::server_port()))?
    .run()
    .await
}
