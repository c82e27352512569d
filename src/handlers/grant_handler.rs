use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::config;
use crate::routes::app_state::AppState;
use crate::services::email_provider::EmailError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGrantRequest {
    pub grant_id: String,
}

fn session_grant(session: &Session) -> Option<String> {
    session
        .get::<String>(config::GRANT_SESSION_KEY)
        .unwrap_or_else(|e| {
            error!("Failed to read grant from session: {}", e);
            None
        })
}

/// Returns the server's last-known grant for this session.
pub async fn get_grant_id(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "grantId": session_grant(&session) }))
}

/// Reports whether the session's grant is usable. With a configured Nylas
/// API key the grant is verified upstream; otherwise presence in the
/// session is all we can check.
pub async fn connection_status(data: web::Data<AppState>, session: Session) -> HttpResponse {
    let connected = match session_grant(&session) {
        None => false,
        Some(grant) => match data.nylas.verify_grant(&grant).await {
            Ok(valid) => valid,
            Err(EmailError::Configuration(_)) => true,
            Err(e) => {
                error!("Grant verification failed: {}", e);
                false
            }
        },
    };
    HttpResponse::Ok().json(json!({ "connected": connected }))
}

/// Adopts a client-held grant into the server session.
pub async fn set_grant_id(session: Session, body: web::Json<SetGrantRequest>) -> HttpResponse {
    if body.grant_id.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "grantId must not be empty" }));
    }
    match session.insert(config::GRANT_SESSION_KEY, body.grant_id.clone()) {
        Ok(()) => {
            info!("Grant adopted into server session");
            HttpResponse::Ok().json(json!({ "success": true }))
        }
        Err(e) => {
            error!("Failed to store grant in session: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}

/// Installs the fixed demo grant into the session. Test/demo path only.
pub async fn set_direct_grant(session: Session) -> HttpResponse {
    match session.insert(config::GRANT_SESSION_KEY, config::DIRECT_TEST_GRANT) {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "grantId": config::DIRECT_TEST_GRANT,
        })),
        Err(e) => {
            error!("Failed to store demo grant in session: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}
