//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated learner from a JWT Bearer token.

pub mod auth;
