use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::config;
use crate::models::app_config::AppConfigPatch;
use crate::models::message::EmailMessage;
use crate::routes::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub messages: Vec<EmailMessage>,
}

/// Sends a batch of outreach emails through the configured provider.
pub async fn send_emails(
    data: web::Data<AppState>,
    session: Session,
    body: web::Json<SendRequest>,
) -> HttpResponse {
    if body.messages.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "messages must not be empty" }));
    }

    // A grant living in this request's session is adopted into the process
    // grant store so the account-linked client can use it.
    match session.get::<String>(config::GRANT_SESSION_KEY) {
        Ok(Some(grant)) => {
            if data.grants.load().as_deref() != Some(grant.as_str()) {
                if let Err(e) = data.grants.store(&grant) {
                    error!("Failed to adopt session grant: {}", e);
                }
            }
        }
        Ok(None) => {}
        Err(e) => error!("Failed to read grant from session: {}", e),
    }

    info!("Dispatching outreach batch of {} message(s)", body.messages.len());
    let outcome = data.dispatcher.dispatch_send(&body.messages).await;
    HttpResponse::Ok().json(outcome)
}

/// Returns the current email-service configuration.
pub async fn get_config(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.config.get())
}

/// Applies a partial configuration update.
pub async fn update_config(
    data: web::Data<AppState>,
    body: web::Json<AppConfigPatch>,
) -> HttpResponse {
    match data.config.update(&body) {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => {
            error!("Failed to update email config: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}
