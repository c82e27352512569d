use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

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
    GrantStore, HttpSessionApi, MemoryGrantStore, SessionBridge,
};

fn test_state() -> AppState {
    // The suite must not pick up real provider credentials from the
    // environment: without keys the Resend client is unconfigured and
    // connection-status trusts session presence.
    std::env::remove_var(config::RESEND_API_KEY_VAR);
    std::env::remove_var(config::NYLAS_API_KEY_VAR);

    let secrets = Arc::new(SecretStore::new());
    let path = std::env::temp_dir().join(format!("care-api-{}.json", Uuid::new_v4()));
    let config_store = Arc::new(ConfigStore::new(path, Arc::clone(&secrets)));
    let grants: Arc<dyn GrantStore> = Arc::new(MemoryGrantStore::new());

    let bridge = Arc::new(SessionBridge::new(
        Arc::clone(&grants),
        Arc::new(HttpSessionApi::new("http://127.0.0.1:1")),
    ));
    let nylas = Arc::new(NylasClient::new(Arc::clone(&secrets), Arc::clone(&grants)));
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&config_store),
        bridge,
        Arc::new(ResendClient::new(Arc::clone(&secrets))),
        Arc::clone(&nylas) as Arc<dyn EmailProvider>,
        Arc::new(MockMailer),
    ));

    AppState {
        config: config_store,
        dispatcher,
        grants,
        nylas,
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(MemorySessionStore::new(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($state))
                .configure(routes::grant_routes::init_routes)
                .configure(routes::email_routes::init_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn direct_test_grant_round_trips_through_the_session() {
    let app = test_app!(test_state());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/direct/set-direct-grant")
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let cookie = res
        .response()
        .cookies()
        .next()
        .expect("session cookie missing")
        .into_owned();

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/nylas/grant-id")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(body["grantId"], config::DIRECT_TEST_GRANT);
}

#[actix_web::test]
async fn restored_grant_reports_connected() {
    let app = test_app!(test_state());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/nylas/set-grant-id")
            .set_json(json!({ "grantId": "abc" }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let cookie = res
        .response()
        .cookies()
        .next()
        .expect("session cookie missing")
        .into_owned();

    let status: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/nylas/connection-status")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status["connected"], true);

    let grant: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/nylas/grant-id")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(grant["grantId"], "abc");
}

#[actix_web::test]
async fn fresh_session_is_not_connected() {
    let app = test_app!(test_state());

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/nylas/connection-status")
            .to_request(),
    )
    .await;
    assert_eq!(body["connected"], false);

    let grant: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/nylas/grant-id")
            .to_request(),
    )
    .await;
    assert!(grant["grantId"].is_null());
}

#[actix_web::test]
async fn empty_grant_is_rejected() {
    let app = test_app!(test_state());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/nylas/set-grant-id")
            .set_json(json!({ "grantId": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn send_with_no_backend_configured_uses_the_mock_mailer() {
    let app = test_app!(test_state());

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/email/send")
            .set_json(json!({
                "messages": [
                    {
                        "to": "provider@example.com",
                        "subject": "Care inquiry",
                        "body": "We are looking for respite care."
                    },
                    {
                        "to": "clinic@example.com",
                        "subject": "Care inquiry",
                        "body": "We are looking for respite care."
                    }
                ]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["sent"], 2);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["total"], 2);
    let id = body["results"][0]["messageId"].as_str().unwrap_or_default();
    assert!(id.starts_with("mock-"), "expected mock id, got {}", id);
}

#[actix_web::test]
async fn empty_send_request_is_rejected() {
    let app = test_app!(test_state());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/email/send")
            .set_json(json!({ "messages": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn config_endpoint_round_trips_a_provider_switch() {
    let app = test_app!(test_state());

    let current: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/email/config").to_request(),
    )
    .await;
    assert_eq!(current["emailService"]["provider"], "fallback");

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/email/config")
            .set_json(json!({ "emailService": { "provider": "resend" } }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["emailService"]["provider"], "resend");

    let reread: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/email/config").to_request(),
    )
    .await;
    assert_eq!(reread["emailService"]["provider"], "resend");
}
