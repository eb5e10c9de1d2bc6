//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireCreator`] -- Requires the `creator` role.

pub mod auth;
pub mod rbac;
