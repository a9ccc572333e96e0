//! Request extractors for authentication.
//!
//! - [`auth::AuthCustomer`] -- the customer behind a JWT Bearer token.

pub mod auth;
