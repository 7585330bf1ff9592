//! Visibility & filter engine.
//!
//! Decides which loan records a role sees, which fields of each record it
//! sees, and how the displayed set reacts to view-mode and status-filter
//! changes. No I/O happens here: the engine hands out [`FetchTicket`]s and the
//! caller resolves them with whatever the gateway returned.
//!
//! # Invariants
//! - `totalLoan` reaches a viewer only through [`project`], and only for roles
//!   granted `loans.total.read`.
//! - Delete is allowed only for roles granted `loans.delete`.
//! - Every view-mode change resets the status filter to `all`.
//! - The displayed set always derives from the most recently *resolved* fetch;
//!   results of superseded fetches are dropped.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use loanportal_auth::{Permission, authorize};
use loanportal_core::{DomainError, Loan, LoanId, LoanStatus, Role};

use crate::error::PortalError;

// ─────────────────────────────────────────────────────────────────────────────
// View mode & status filter
// ─────────────────────────────────────────────────────────────────────────────

/// Which loan collection is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    All,
    MyLoans,
    Expired,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::All => "all",
            ViewMode::MyLoans => "my-loans",
            ViewMode::Expired => "expired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::All => "All Loans",
            ViewMode::MyLoans => "My Loans",
            ViewMode::Expired => "Expired Loans",
        }
    }
}

impl core::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ViewMode::All),
            "my-loans" | "mine" => Ok(ViewMode::MyLoans),
            "expired" => Ok(ViewMode::Expired),
            other => Err(DomainError::unknown_variant("view mode", other)),
        }
    }
}

/// Client-side narrowing of the fetched collection by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LoanStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: LoanStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl From<LoanStatus> for StatusFilter {
    fn from(value: LoanStatus) -> Self {
        StatusFilter::Only(value)
    }
}

impl core::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => core::fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<LoanStatus>().map(StatusFilter::Only)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projection & policy
// ─────────────────────────────────────────────────────────────────────────────

/// Loan record as shown to a specific role.
///
/// `total_loan` is omitted from the serialized form when withheld, so a
/// masked record carries no `totalLoan` key at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLoan {
    pub id: LoanId,
    pub user_email: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_loan: Option<f64>,
    pub status: LoanStatus,
    pub interest_rate: f64,
    #[serde(with = "loanportal_core::loan::wire_date")]
    pub maturity_date: NaiveDate,
    #[serde(with = "loanportal_core::loan::wire_date")]
    pub application_date: NaiveDate,
    pub purpose: String,
}

/// Shape a raw loan for `role`, withholding fields the role may not see.
pub fn project(loan: &Loan, role: Role) -> DisplayLoan {
    let total_loan = match authorize(role, &Permission::LOANS_TOTAL_READ) {
        Ok(()) => loan.total_loan,
        Err(_) => None,
    };

    DisplayLoan {
        id: loan.id.clone(),
        user_email: loan.user_email.clone(),
        amount: loan.amount,
        total_loan,
        status: loan.status,
        interest_rate: loan.interest_rate,
        maturity_date: loan.maturity_date,
        application_date: loan.application_date,
        purpose: loan.purpose.clone(),
    }
}

/// Whether `role` may delete loans.
pub fn authorize_delete(role: Role) -> bool {
    authorize(role, &Permission::LOANS_DELETE).is_ok()
}

/// Order-preserving status filter.
pub fn filter_by_status(loans: &[Loan], filter: StatusFilter) -> Vec<&Loan> {
    loans.iter().filter(|loan| filter.matches(loan.status)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Fetch tickets
// ─────────────────────────────────────────────────────────────────────────────

/// Gateway query a view mode maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchQuery {
    All,
    ByUser(String),
    Expired,
}

/// A fetch the engine asked for. Only the newest ticket may be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    mode: ViewMode,
    query: FetchQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn query(&self) -> &FetchQuery {
        &self.query
    }
}

/// Outcome of resolving a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The fetched collection replaced the raw collection.
    Applied,
    /// The fetch failed; the previous collection is still displayed.
    Failed,
    /// A newer ticket exists; the result was dropped.
    Superseded,
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

/// Engine state for one signed-in viewer.
#[derive(Debug, Clone)]
pub struct LoanView {
    role: Role,
    user_email: String,
    raw: Vec<Loan>,
    view_mode: ViewMode,
    status_filter: StatusFilter,
    last_error: Option<PortalError>,
    issued: u64,
    in_flight: Option<u64>,
}

impl LoanView {
    /// Initial state: `all` view, nothing fetched yet.
    pub fn new(role: Role, user_email: impl Into<String>) -> Self {
        Self {
            role,
            user_email: user_email.into(),
            raw: Vec::new(),
            view_mode: ViewMode::All,
            status_filter: StatusFilter::All,
            last_error: None,
            issued: 0,
            in_flight: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    /// Error from the latest failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&PortalError> {
        self.last_error.as_ref()
    }

    /// True while a ticket is outstanding; front ends disable controls.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Raw collection from the latest successful fetch (unmasked).
    pub fn raw(&self) -> &[Loan] {
        &self.raw
    }

    /// Entry into the initial state: fetch the current view.
    pub fn enter(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Switch view mode.
    ///
    /// Selecting the active mode is a no-op and returns `None`; otherwise the
    /// status filter resets and the new mode's fetch is issued.
    pub fn select_view(&mut self, mode: ViewMode) -> Option<FetchTicket> {
        if mode == self.view_mode {
            tracing::debug!(%mode, "view already active; not refetching");
            return None;
        }

        tracing::debug!(from = %self.view_mode, to = %mode, "switching view");
        self.view_mode = mode;
        self.status_filter = StatusFilter::All;
        Some(self.issue())
    }

    /// Re-enter the current view (after a delete, or to retry a failure).
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Change the status filter. Only honoured in the `all` view; returns
    /// whether the filter changed.
    pub fn select_status(&mut self, filter: StatusFilter) -> bool {
        if self.view_mode != ViewMode::All {
            tracing::debug!(mode = %self.view_mode, %filter, "status filter ignored outside the all view");
            return false;
        }
        self.status_filter = filter;
        true
    }

    /// Apply a gateway result to the ticket it was issued for.
    pub fn resolve(&mut self, ticket: &FetchTicket, result: Result<Vec<Loan>, PortalError>) -> Resolution {
        if self.in_flight != Some(ticket.generation) {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                "dropping superseded fetch result"
            );
            return Resolution::Superseded;
        }
        self.in_flight = None;

        match result {
            Ok(loans) => {
                tracing::debug!(mode = %ticket.mode, count = loans.len(), "fetch applied");
                self.raw = loans;
                self.last_error = None;
                Resolution::Applied
            }
            Err(err) => {
                tracing::warn!(mode = %ticket.mode, error = %err, "fetch failed; keeping previous loans");
                self.last_error = Some(err);
                Resolution::Failed
            }
        }
    }

    /// Records to render, filtered and masked for the viewer's role.
    pub fn displayed(&self) -> Vec<DisplayLoan> {
        filter_by_status(&self.raw, self.status_filter)
            .into_iter()
            .map(|loan| project(loan, self.role))
            .collect()
    }

    /// Gate for the delete action, checked before any request is made.
    pub fn authorize_delete(&self) -> Result<(), PortalError> {
        if authorize_delete(self.role) {
            Ok(())
        } else {
            Err(PortalError::Authorization(format!(
                "only superadmins can delete loans (role: {})",
                self.role
            )))
        }
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        self.in_flight = Some(self.issued);

        let query = match self.view_mode {
            ViewMode::All => FetchQuery::All,
            ViewMode::MyLoans => FetchQuery::ByUser(self.user_email.clone()),
            ViewMode::Expired => FetchQuery::Expired,
        };

        FetchTicket {
            generation: self.issued,
            mode: self.view_mode,
            query,
        }
    }
}
