//! Signed session cookie handling
//!
//! The cookie value is `<session id>.<signature>` where the signature is an
//! HMAC-SHA256 over the identifier. A bad or missing signature is treated
//! exactly like a missing cookie so that stale cookies from a key rotation
//! self-heal into a fresh anonymous session instead of erroring.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::HeaderMap;
use http::header::{COOKIE, SET_COOKIE};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::{GATE_SERVER_SECRET, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::session::types::SessionId;

type HmacSha256 = Hmac<Sha256>;

fn sign(session_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(&GATE_SERVER_SECRET).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

pub fn encode_cookie_value(id: &SessionId) -> String {
    format!("{}.{}", id.as_str(), sign(id.as_str()))
}

/// Recover the session id from a cookie value, or `None` if the signature
/// does not verify.
pub fn decode_cookie_value(value: &str) -> Option<SessionId> {
    let (id, signature) = value.rsplit_once('.')?;
    let expected = sign(id);
    bool::from(signature.as_bytes().ct_eq(expected.as_bytes()))
        .then(|| SessionId::new(id.to_string()))
}

/// Extract and verify the session id carried by the request's Cookie header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    let cookie_str = headers.get(COOKIE)?.to_str().ok()?;
    let cookie_name = SESSION_COOKIE_NAME.as_str();

    let raw = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    })?;

    let id = decode_cookie_value(raw);
    if id.is_none() {
        tracing::debug!("Session cookie present but signature did not verify");
    }
    id
}

/// RFC 7231 HTTP-date, used for both the Date header and cookie Expires so
/// the two always derive from the same instant.
pub fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn set_session_cookie(
    headers: &mut HeaderMap,
    id: &SessionId,
    expires_at: DateTime<Utc>,
) -> Result<(), SessionError> {
    let cookie = format!(
        "{}={}; Expires={}; Max-Age={}; SameSite=Lax; HttpOnly; Path=/",
        SESSION_COOKIE_NAME.as_str(),
        encode_cookie_value(id),
        http_date(expires_at),
        SESSION_COOKIE_MAX_AGE,
    );
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| SessionError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(())
}

/// Expire the session cookie immediately (sign-out).
pub fn clear_session_cookie(headers: &mut HeaderMap) -> Result<(), SessionError> {
    let cookie = format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; SameSite=Lax; HttpOnly; Path=/",
        SESSION_COOKIE_NAME.as_str(),
    );
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| SessionError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(())
}
