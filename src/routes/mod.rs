pub mod app_state;
pub mod email_routes;
pub mod grant_routes;
