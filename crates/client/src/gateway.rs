//! Loan data gateway: the four loan endpoints, nothing else.
//!
//! No retries and no business logic live here. Every non-success response or
//! transport failure becomes a typed [`PortalError`].

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use loanportal_core::{Loan, LoanId};

use crate::config::ClientConfig;
use crate::error::PortalError;
use crate::session::AuthToken;

/// Acknowledgement of a successful delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<LoanId>,
}

#[async_trait]
pub trait LoanGateway: Send + Sync {
    async fn fetch_all(&self, token: &AuthToken) -> Result<Vec<Loan>, PortalError>;

    async fn fetch_by_user(&self, token: &AuthToken, email: &str) -> Result<Vec<Loan>, PortalError>;

    async fn fetch_expired(&self, token: &AuthToken) -> Result<Vec<Loan>, PortalError>;

    async fn delete(&self, token: &AuthToken, loan_id: &LoanId) -> Result<DeleteAck, PortalError>;
}

#[derive(Debug, Deserialize)]
struct LoansEnvelope {
    #[serde(default)]
    loans: Vec<Loan>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Gateway over the portal's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLoanGateway {
    client: reqwest::Client,
    base: Url,
}

impl HttpLoanGateway {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(config.http_client()?, parse_base(&config.api_url)?))
    }

    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    async fn get_loans(&self, token: &AuthToken, segments: &[&str]) -> Result<Vec<Loan>, PortalError> {
        let url = endpoint(&self.base, segments)?;
        tracing::debug!(%url, "fetching loans");

        let resp = self.client.get(url).bearer_auth(token.as_str()).send().await?;
        let envelope: LoansEnvelope = check_status(resp).await?.json().await?;

        tracing::debug!(count = envelope.loans.len(), "loans fetched");
        Ok(envelope.loans)
    }
}

#[async_trait]
impl LoanGateway for HttpLoanGateway {
    async fn fetch_all(&self, token: &AuthToken) -> Result<Vec<Loan>, PortalError> {
        self.get_loans(token, &["api", "loans"]).await
    }

    async fn fetch_by_user(&self, token: &AuthToken, email: &str) -> Result<Vec<Loan>, PortalError> {
        self.get_loans(token, &["api", "loans", email, "get"]).await
    }

    async fn fetch_expired(&self, token: &AuthToken) -> Result<Vec<Loan>, PortalError> {
        self.get_loans(token, &["api", "loans", "expired"]).await
    }

    async fn delete(&self, token: &AuthToken, loan_id: &LoanId) -> Result<DeleteAck, PortalError> {
        let url = endpoint(&self.base, &["api", "loans", loan_id.as_str(), "delete"])?;
        tracing::debug!(%url, "deleting loan");

        let resp = self.client.delete(url).bearer_auth(token.as_str()).send().await?;
        let body = check_status(resp).await?.text().await?;

        if body.trim().is_empty() {
            return Ok(DeleteAck::default());
        }
        serde_json::from_str(&body)
            .map_err(|e| PortalError::server(None, format!("malformed delete acknowledgement: {e}")))
    }
}

pub(crate) fn parse_base(api_url: &str) -> anyhow::Result<Url> {
    Url::parse(api_url).map_err(|e| anyhow::anyhow!("invalid API URL {api_url:?}: {e}"))
}

/// Append path segments to the base URL; each segment is percent-encoded.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, PortalError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| PortalError::server(None, format!("API URL cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map a non-success response onto the error taxonomy.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, PortalError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    tracing::warn!(status = status.as_u16(), %message, "request rejected");

    Err(match status {
        StatusCode::UNAUTHORIZED => PortalError::Auth(message),
        StatusCode::FORBIDDEN => PortalError::Authorization(message),
        _ => PortalError::server(Some(status.as_u16()), message),
    })
}
