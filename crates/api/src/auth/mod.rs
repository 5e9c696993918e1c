//! JWT validation for owner identity.
//!
//! Accounts live in a separate identity service; this service only
//! validates the HS256 access tokens it issues.

pub mod jwt;
