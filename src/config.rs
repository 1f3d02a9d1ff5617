// Configuration: the one-time initialization step that loads credentials
// before the menu starts. Values come from the process environment, after
// an optional `.env` file has been merged in.

use crate::error::ClientError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const APP_DIR_NAME: &str = "assistant-files";

/// Settings needed to build an authenticated `ApiClient`.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub timeout: Duration,
}

// Hand-written so the key never shows up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load a `.env` file (working directory first, then the user config
    /// directory) and read the `OPENAI_*` variables.
    pub fn from_env() -> Result<Self, ClientError> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty("OPENAI_API_KEY").ok_or(ClientError::MissingApiKey)?;
        let base_url = non_empty("OPENAI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match non_empty("OPENAI_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "ignoring unparseable OPENAI_TIMEOUT_SECS");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_key,
            base_url,
            organization: non_empty("OPENAI_ORG_ID"),
            project: non_empty("OPENAI_PROJECT_ID"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Merge a `.env` file into the process environment. Existing variables win.
fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(_) => {
            if let Some(path) = user_env_file().filter(|p| p.exists()) {
                match dotenv::from_path(&path) {
                    Ok(()) => tracing::debug!(path = %path.display(), "loaded .env"),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to load .env"),
                }
            }
        }
    }
}

/// `<config dir>/assistant-files/.env`, e.g. `~/.config/assistant-files/.env`.
fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(".env"))
}
