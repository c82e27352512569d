use actix_session::Session;
use actix_web::{get, post, web, Responder};

use crate::handlers::email_handler::SendRequest;
use crate::models::app_config::AppConfigPatch;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(send_emails).service(get_config).service(update_config);
}

#[post("/api/email/send")]
async fn send_emails(
    data: web::Data<AppState>,
    session: Session,
    body: web::Json<SendRequest>,
) -> impl Responder {
    crate::handlers::email_handler::send_emails(data, session, body).await
}

#[get("/api/email/config")]
async fn get_config(data: web::Data<AppState>) -> impl Responder {
    crate::handlers::email_handler::get_config(data).await
}

#[post("/api/email/config")]
async fn update_config(
    data: web::Data<AppState>,
    body: web::Json<AppConfigPatch>,
) -> impl Responder {
    crate::handlers::email_handler::update_config(data, body).await
}
