//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in the initial
//! migration.

pub const ROLE_USER: &str = "user";
pub const ROLE_CREATOR: &str = "creator";

/// Role assigned at registration.
pub fn role_for_registration(wants_creator: bool) -> &'static str {
    if wants_creator {
        ROLE_CREATOR
    } else {
        ROLE_USER
    }
}
