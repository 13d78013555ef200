//! CSRF token issuance and verification
//!
//! A token is minted per session and re-issued on each authenticated
//! full-page render. Mutating requests must echo it back via the
//! `X-CSRF-Token` header; the comparison is constant-time. Tokens travel in
//! page content only, never in response headers.

use http::{HeaderMap, Method};
use subtle::ConstantTimeEq;

use crate::session::errors::SessionError;
use crate::utils::gen_random_string;

pub const CSRF_HEADER: &str = "x-csrf-token";

pub fn mint_csrf_token() -> Result<String, SessionError> {
    Ok(gen_random_string(32)?)
}

/// Methods that may change state and therefore require a token.
pub fn is_mutating(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::DELETE
        || method == Method::PATCH
}

/// Verify the `X-CSRF-Token` request header against the session's token.
pub fn verify_csrf_header(headers: &HeaderMap, expected: &str) -> Result<(), SessionError> {
    let Some(provided) = headers.get(CSRF_HEADER).and_then(|h| h.to_str().ok()) else {
        tracing::debug!("No CSRF token found");
        return Err(SessionError::CsrfToken("No CSRF token found".to_string()));
    };

    if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        tracing::debug!("CSRF token mismatch");
        return Err(SessionError::CsrfToken("CSRF token mismatch".to_string()));
    }

    Ok(())
}
