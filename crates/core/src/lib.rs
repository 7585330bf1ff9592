//! `loanportal-core`: domain model shared by the client and the API.
//!
//! This crate contains **pure domain** types (no I/O, no transport concerns).

pub mod error;
pub mod id;
pub mod loan;
pub mod role;
pub mod user;

pub use error::DomainError;
pub use id::{LoanId, UserId};
pub use loan::{Loan, LoanStatus};
pub use role::Role;
pub use user::User;
