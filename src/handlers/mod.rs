pub mod email_handler;
pub mod grant_handler;
