use std::env;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("MINDWELL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MINDWELL_API_URL not set, using {}", DEFAULT_API_URL);
                    DEFAULT_API_URL.to_string()
                }),
            session_path: env::var("MINDWELL_SESSION_PATH")
                .unwrap_or_else(|_| {
                    let default = default_session_path();
                    warn!("MINDWELL_SESSION_PATH not set, using {}", default);
                    default
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty() && !self.session_path.is_empty()
    }
}

fn default_session_path() -> String {
    match env::var("HOME") {
        Ok(home) => format!("{}/.mindwell/session.json", home),
        Err(_) => ".mindwell-session.json".to_string(),
    }
}
