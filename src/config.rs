use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Client configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation API, including the `/api` prefix
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the login session (token, user id, username) is persisted
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// How long a notice stays visible
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,

    /// Delay between a successful survey submission and the dashboard redirect
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

fn default_api_url() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".wili-session.json")
}

fn default_notice_secs() -> u64 {
    5
}

fn default_redirect_delay_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_file: default_session_file(),
            notice_secs: default_notice_secs(),
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}
