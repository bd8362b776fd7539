//! Role string parsing
//!
//! The auth service stores a user's roles as one comma-separated string,
//! e.g. `"user, admin"`.

/// Role token that grants access to the console
pub const ADMIN_ROLE: &str = "admin";

/// True iff one of the comma-separated tokens of `role` is `admin`,
/// ignoring surrounding whitespace and case.
pub fn is_admin_role(role: Option<&str>) -> bool {
    role.map_or(false, |role| {
        role.split(',')
            .any(|token| token.trim().eq_ignore_ascii_case(ADMIN_ROLE))
    })
}
