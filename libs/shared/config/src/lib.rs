use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "https://appointment-manager-node.onrender.com/api/v1";
pub const DEFAULT_SESSION_FILE: &str = ".medconnect/session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DOCTORS_PAGE_SIZE: u32 = 9;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub request_timeout_secs: u64,
    pub doctors_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            doctors_page_size: DEFAULT_DOCTORS_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("MEDCONNECT_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("MEDCONNECT_API_URL not set, using default");
                    DEFAULT_API_BASE_URL.to_string()
                }),
            session_file: env::var("MEDCONNECT_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("MEDCONNECT_SESSION_FILE not set, using {}", DEFAULT_SESSION_FILE);
                    PathBuf::from(DEFAULT_SESSION_FILE)
                }),
            request_timeout_secs: env::var("MEDCONNECT_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| match raw.parse::<u64>() {
                    Ok(secs) if secs > 0 => Some(secs),
                    _ => {
                        warn!("MEDCONNECT_REQUEST_TIMEOUT_SECS is not a positive integer: {}", raw);
                        None
                    }
                })
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            doctors_page_size: DEFAULT_DOCTORS_PAGE_SIZE,
        };

        if !config.is_configured() {
            warn!("Client not fully configured - API base URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}
