pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

/// Default sender identity used when an outgoing message carries no `from`.
pub const DEFAULT_FROM_ADDRESS: &str = "Care Outreach <outreach@careoutreach.example>";

/// Fixed grant installed by the direct test/demo endpoint.
pub const DIRECT_TEST_GRANT: &str = "care-demo-grant";

/// Session key under which the server keeps the linked-account grant.
pub const GRANT_SESSION_KEY: &str = "nylas_grant_id";

/// Persisted email-service configuration document.
pub const CONFIG_FILE: &str = "cfg/email-config.json";

/// Client-side cache of the linked-account grant.
pub const GRANT_CACHE_FILE: &str = "grantcache.json";

pub const RESEND_API_KEY_VAR: &str = "RESEND_API_KEY";
pub const NYLAS_API_KEY_VAR: &str = "NYLAS_API_KEY";

const RESEND_API_URL: &str = "https://api.resend.com/emails";

pub fn resend_api_url() -> String {
    String::from(RESEND_API_URL)
}

const NYLAS_API_URL: &str = "https://api.us.nylas.com/v3";

pub fn nylas_api_url() -> String {
    String::from(NYLAS_API_URL)
}

const SERVER_HOST: &str = "127.0.0.1";
const SERVER_PORT: u16 = 8080;

pub fn server_host() -> String {
    String::from(SERVER_HOST)
}

pub fn server_port() -> u16 {
    SERVER_PORT
}

/// Origin the session bridge talks to when reconciling grant state.
pub fn session_api_base() -> String {
    format!("http://{}:{}", SERVER_HOST, SERVER_PORT)
}
