//! Server configuration, read once from the environment.

use std::net::SocketAddr;

use anyhow::Context;
use chrono::Duration;

pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    /// Lifetime of a regular session token.
    pub token_ttl: Duration,
    /// Lifetime of a token issued with `rememberMe`.
    pub remember_me_ttl: Duration,
}

impl ApiConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            token_ttl: Duration::minutes(60),
            remember_me_ttl: Duration::days(30),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let mut config = Self::new(jwt_secret);

        if let Ok(raw) = std::env::var("LOANPORTAL_BIND") {
            config.bind_addr = raw
                .parse()
                .with_context(|| format!("LOANPORTAL_BIND is not a socket address: {raw:?}"))?;
        }
        if let Ok(raw) = std::env::var("LOANPORTAL_TOKEN_TTL_MINUTES") {
            let minutes: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("LOANPORTAL_TOKEN_TTL_MINUTES is not a number: {raw:?}"))?;
            config.token_ttl = Duration::minutes(minutes);
        }
        if let Ok(raw) = std::env::var("LOANPORTAL_REMEMBER_ME_TTL_DAYS") {
            let days: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("LOANPORTAL_REMEMBER_ME_TTL_DAYS is not a number: {raw:?}"))?;
            config.remember_me_ttl = Duration::days(days);
        }

        Ok(config)
    }
}
