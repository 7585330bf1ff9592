//! `loanportal-client`
//!
//! **Responsibility:** the portal's client side.
//!
//! This crate provides:
//! - A persisted session store (token + user identity)
//! - The loan data gateway (HTTP, no business logic)
//! - The role-aware visibility & filter engine
//! - A dashboard driver wiring the engine to the gateway
//!
//! The loan backend remains the authority; the client never mutates loans
//! locally and always refetches after a delete.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod format;
pub mod gateway;
pub mod session;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use dashboard::Dashboard;
pub use engine::{
    DisplayLoan, FetchQuery, FetchTicket, LoanView, Resolution, StatusFilter, ViewMode,
    authorize_delete, filter_by_status, project,
};
pub use error::PortalError;
pub use gateway::{DeleteAck, HttpLoanGateway, LoanGateway};
pub use session::{AuthToken, FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};
