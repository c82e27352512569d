use actix_session::Session;
use actix_web::{get, post, web, Responder};

use crate::handlers::grant_handler::SetGrantRequest;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_grant_id)
        .service(connection_status)
        .service(set_grant_id)
        .service(set_direct_grant);
}

#[get("/api/nylas/grant-id")]
async fn get_grant_id(session: Session) -> impl Responder {
    crate::handlers::grant_handler::get_grant_id(session).await
}

#[get("/api/nylas/connection-status")]
async fn connection_status(data: web::Data<AppState>, session: Session) -> impl Responder {
    crate::handlers::grant_handler::connection_status(data, session).await
}

#[post("/api/nylas/set-grant-id")]
async fn set_grant_id(session: Session, body: web::Json<SetGrantRequest>) -> impl Responder {
    crate::handlers::grant_handler::set_grant_id(session, body).await
}

#[post("/api/direct/set-direct-grant")]
async fn set_direct_grant(session: Session) -> impl Responder {
    crate::handlers::grant_handler::set_direct_grant(session).await
}
