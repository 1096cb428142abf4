//! Authentication primitives.
//!
//! Tokens are issued by the external auth provider; this server only
//! validates them. [`jwt::generate_access_token`] exists for tooling and
//! tests that need to mint a token with the shared secret.

pub mod jwt;
