//! Dashboard driver: binds the engine to a gateway and a session.

use loanportal_core::{Loan, LoanId, Role, User};

use crate::engine::{DisplayLoan, FetchQuery, FetchTicket, LoanView, Resolution, StatusFilter, ViewMode};
use crate::error::PortalError;
use crate::gateway::{DeleteAck, LoanGateway};
use crate::session::{AuthToken, Session, SessionStore};

/// One signed-in viewer's loan dashboard.
///
/// Every fetch goes through a [`FetchTicket`], so a result that arrives after
/// a newer request has been issued is dropped instead of overwriting it.
pub struct Dashboard<G> {
    gateway: G,
    session: Session,
    view: LoanView,
}

impl<G: LoanGateway> Dashboard<G> {
    /// Open the dashboard for the stored session.
    pub fn open(gateway: G, store: &dyn SessionStore) -> Result<Self, PortalError> {
        let session = store
            .load()
            .ok_or_else(|| PortalError::Auth("not signed in".to_string()))?;
        Ok(Self::new(gateway, session))
    }

    pub fn new(gateway: G, session: Session) -> Self {
        let view = LoanView::new(session.user.role, session.user.email.clone());
        Self {
            gateway,
            session,
            view,
        }
    }

    /// Initial entry: loads the `all` view.
    pub async fn start(&mut self) -> Result<(), PortalError> {
        let ticket = self.view.enter();
        self.run(ticket).await
    }

    /// Switch view mode; a no-op when `mode` is already active.
    pub async fn switch_view(&mut self, mode: ViewMode) -> Result<(), PortalError> {
        match self.view.select_view(mode) {
            Some(ticket) => self.run(ticket).await,
            None => Ok(()),
        }
    }

    /// Narrow the displayed set by status (no network call).
    pub fn filter_status(&mut self, filter: StatusFilter) -> bool {
        self.view.select_status(filter)
    }

    /// Refetch the current view.
    pub async fn refresh(&mut self) -> Result<(), PortalError> {
        let ticket = self.view.refresh();
        self.run(ticket).await
    }

    /// Delete a loan, then reload the current view from the backend.
    ///
    /// Unauthorized roles are rejected before any request is made. A failed
    /// reload after a successful delete is reported through
    /// [`Dashboard::last_error`]; the delete itself still succeeded.
    pub async fn delete_loan(&mut self, loan_id: &LoanId) -> Result<DeleteAck, PortalError> {
        self.view.authorize_delete()?;

        let ack = self.gateway.delete(&self.session.token, loan_id).await?;
        tracing::info!(%loan_id, "loan deleted");

        if let Err(err) = self.refresh().await {
            tracing::warn!(%loan_id, error = %err, "reload after delete failed");
        }
        Ok(ack)
    }

    pub fn displayed(&self) -> Vec<DisplayLoan> {
        self.view.displayed()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view.view_mode()
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.view.status_filter()
    }

    pub fn last_error(&self) -> Option<&PortalError> {
        self.view.last_error()
    }

    pub fn is_loading(&self) -> bool {
        self.view.is_loading()
    }

    pub fn role(&self) -> Role {
        self.view.role()
    }

    pub fn user(&self) -> &User {
        &self.session.user
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn run(&mut self, ticket: FetchTicket) -> Result<(), PortalError> {
        let result = fetch(&self.gateway, &self.session.token, ticket.query()).await;
        let outcome = match &result {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone()),
        };

        match self.view.resolve(&ticket, result) {
            Resolution::Superseded => Ok(()),
            Resolution::Applied | Resolution::Failed => outcome,
        }
    }
}

/// Run the gateway call a query stands for.
pub(crate) async fn fetch<G: LoanGateway + ?Sized>(
    gateway: &G,
    token: &AuthToken,
    query: &FetchQuery,
) -> Result<Vec<Loan>, PortalError> {
    match query {
        FetchQuery::All => gateway.fetch_all(token).await,
        FetchQuery::ByUser(email) => gateway.fetch_by_user(token, email).await,
        FetchQuery::Expired => gateway.fetch_expired(token).await,
    }
}
