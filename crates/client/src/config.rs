//! Client configuration, read once from the environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the portal backend (no trailing slash).
    pub api_url: String,
    /// Directory holding the persisted session.
    pub session_dir: PathBuf,
    /// Per-request timeout; exceeding it is a network error.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Build the configuration from `LOANPORTAL_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = std::env::var("LOANPORTAL_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let session_dir = match std::env::var_os("LOANPORTAL_SESSION_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_session_dir()?,
        };

        let request_timeout = match std::env::var("LOANPORTAL_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("LOANPORTAL_HTTP_TIMEOUT_SECS is not a number: {raw:?}"))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self::new(api_url, session_dir).with_timeout(request_timeout))
    }

    pub fn new(api_url: impl Into<String>, session_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            session_dir: session_dir.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// HTTP client honouring the configured timeout.
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("failed to build HTTP client")
    }
}

fn default_session_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_local_dir() and home_dir()/.local/share")?;

    Ok(base.join("loanportal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let cfg = ClientConfig::new("http://localhost:8080/", "/tmp/lp");
        assert_eq!(cfg.api_url, "http://localhost:8080");
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
