//! Legacy redirect resolver
//!
//! Deprecated top-level paths map permanently onto their admin-area
//! equivalents. The lookup runs before any authentication logic so the
//! aliases keep working for anonymous visitors, and matches never touch
//! session state.

use crate::config::{SIGNIN_PATH, SIGNOUT_PATH, SIGNUP_PATH};

/// Resolve a deprecated path to its canonical admin-area target.
pub fn resolve_legacy_alias(path: &str) -> Option<&'static str> {
    match path {
        "/logout/" => Some(SIGNOUT_PATH),
        "/signout/" => Some(SIGNOUT_PATH),
        "/signin/" => Some(SIGNIN_PATH),
        "/signup/" => Some(SIGNUP_PATH),
        _ => None,
    }
}
