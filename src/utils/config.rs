// src/utils/config.rs
use crate::utils::error::AppError;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Credentials and tunables the pipeline needs before it touches the network.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Descriptive User-Agent required by EDGAR's fair access policy,
    /// e.g. "Acme Research research@acme.example".
    pub user_agent: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub http_timeout: Duration,
}

impl Settings {
    /// Builds settings from an arbitrary key lookup. Required values must be non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = required(&lookup, "EDGAR_USER_AGENT")?;
        let openai_api_key = required(&lookup, "OPENAI_API_KEY")?;

        let openai_base_url = optional(&lookup, "OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        let openai_model = optional(&lookup, "OPENAI_MODEL")
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

        let timeout_secs = match optional(&lookup, "HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            user_agent,
            openai_api_key,
            openai_base_url,
            openai_model,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Loads a `.env` file from the working directory (or a parent) into the
/// process environment. Variables already set win.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| AppError::Config(format!("{} is not set in the environment.", key)))
}
