//! Response construction helpers shared by the middleware and the handlers.

use admin_gate::{
    CacheClass, GateError, SessionContext, SessionError, SessionId, http_date,
    set_session_cookie,
};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use http::{
    HeaderMap, HeaderValue, StatusCode,
    header::{CACHE_CONTROL, DATE, LOCATION},
};

use crate::error::gate_error_response;

/// Stamp the Date header and the session cookie from the same instant, so
/// that cookie `Expires` minus response `Date` is exactly the session TTL.
pub(crate) fn stamp_session_headers(
    headers: &mut HeaderMap,
    id: &SessionId,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<(), SessionError> {
    let date = http_date(issued_at)
        .parse()
        .map_err(|_| SessionError::Cookie("Failed to encode Date header".to_string()))?;
    headers.insert(DATE, date);
    set_session_cookie(headers, id, expires_at)
}

pub(crate) fn apply_cache_class(response: &mut Response, cache: CacheClass) {
    if !response.headers().contains_key(CACHE_CONTROL) {
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(cache.header_value()));
    }
}

/// Build a redirect carrying its cache class and, for a freshly created
/// session, the signed cookie.
pub(crate) fn redirect_response(
    status: StatusCode,
    location: &str,
    cache: CacheClass,
    session: Option<&SessionContext>,
) -> Response {
    let Ok(location) = HeaderValue::from_str(location) else {
        tracing::error!("Redirect target is not a valid header value");
        return gate_error_response(GateError::Collaborator(
            "invalid redirect target".to_string(),
        ));
    };

    let mut response = status.into_response();
    response.headers_mut().insert(LOCATION, location);
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(cache.header_value()));

    if let Some(ctx) = session.filter(|ctx| ctx.fresh) {
        if let Err(e) = stamp_session_headers(
            response.headers_mut(),
            &ctx.session_id,
            ctx.issued_at,
            ctx.expires_at,
        ) {
            tracing::error!("Failed to set session cookie on redirect: {e}");
            return gate_error_response(GateError::Session(e));
        }
    }

    response
}
