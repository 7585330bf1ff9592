//! Login, logout and signup against the portal's authentication endpoints.

use reqwest::Url;

use loanportal_auth::{LoginForm, LoginResponse, SignupForm, SignupResponse};

use crate::config::ClientConfig;
use crate::error::PortalError;
use crate::gateway::{check_status, endpoint, parse_base};
use crate::session::{AuthToken, Session, SessionStore};

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base: Url,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(config.http_client()?, parse_base(&config.api_url)?))
    }

    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Validate the form, authenticate, and persist the resulting session.
    ///
    /// A form that fails validation is never sent.
    pub async fn login(&self, form: &LoginForm, store: &dyn SessionStore) -> Result<Session, PortalError> {
        form.validate()?;

        let url = endpoint(&self.base, &["api", "auth", "login"])?;
        let resp = self.client.post(url).json(&form.to_request()).send().await?;
        let body: LoginResponse = check_status(resp).await?.json().await?;

        let token = AuthToken::new(body.token);
        store.save(&body.user, &token)?;

        tracing::info!(email = %body.user.email, role = %body.user.role, "signed in");
        Ok(Session {
            user: body.user,
            token,
        })
    }

    /// Validate the form and register a new account.
    ///
    /// The session store is untouched: a new account signs in separately.
    pub async fn signup(&self, form: &SignupForm) -> Result<SignupResponse, PortalError> {
        form.validate()?;

        let url = endpoint(&self.base, &["api", "auth", "signup"])?;
        let resp = self.client.post(url).json(&form.to_request()).send().await?;
        let body: SignupResponse = check_status(resp).await?.json().await?;

        tracing::info!(email = %form.email.trim(), "account created");
        Ok(body)
    }

    /// Drop the stored session.
    pub fn logout(&self, store: &dyn SessionStore) -> Result<(), PortalError> {
        store.clear()?;
        tracing::info!("signed out");
        Ok(())
    }
}
