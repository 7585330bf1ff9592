//! `loanportal-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it owns the
//! role policy, login-form validation, and token claims. Both the client and
//! the API enforce access through the same policy.

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod jwt;
pub mod permissions;

pub use authorize::{
    AuthorizationExplanation, AuthzError, authorize, explain_authorization, permissions_for,
};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use credentials::{
    LoginForm, LoginRequest, LoginResponse, SignupForm, SignupRequest, SignupResponse,
    ValidationErrors,
};
pub use jwt::{Hs256JwtIssuer, Hs256JwtValidator, JwtError, JwtValidator};
pub use permissions::Permission;
