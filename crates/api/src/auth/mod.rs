//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification and length rules.
//! - [`jwt`] -- access tokens, refresh-token hashing and password-reset tokens.

pub mod jwt;
pub mod password;
