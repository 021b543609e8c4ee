use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

const SERVER_URL_VAR: &str = "DEEPRECALL_SERVER_URL";
const UPLOAD_TIMEOUT_VAR: &str = "DEEPRECALL_UPLOAD_TIMEOUT_SECS";
const QUERY_TIMEOUT_VAR: &str = "DEEPRECALL_QUERY_TIMEOUT_SECS";

const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 600;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the remote processing service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub server_url: String,
    /// Transcription plus summarization can take minutes for long videos
    pub upload_timeout: Duration,
    pub query_timeout: Duration,
}

impl ServiceConfig {
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: normalize_server_url(server_url),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    /// Read settings from the environment, falling back to the local dev
    /// server. Unparseable timeout values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let server_url =
            std::env::var(SERVER_URL_VAR).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        Self {
            server_url: normalize_server_url(&server_url),
            upload_timeout: env_secs(UPLOAD_TIMEOUT_VAR, DEFAULT_UPLOAD_TIMEOUT_SECS),
            query_timeout: env_secs(QUERY_TIMEOUT_VAR, DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

fn env_secs(var: &str, default: u64) -> Duration {
    let secs = std::env::var(var)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

fn normalize_server_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_SERVER_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
