pub mod config_store;
pub mod dispatch_service;
pub mod email_provider;
pub mod mock_service;
pub mod nylas_service;
pub mod resend_service;
pub mod secrets;
pub mod session_bridge;
