//! HTTP API: the portal's authentication and loan endpoints.
//!
//! Serves as the reference backend for `loanportal-client`. Delete
//! authorization is enforced here independently of any client-side check.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;

pub use config::ApiConfig;
