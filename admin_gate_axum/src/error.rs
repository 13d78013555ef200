use admin_gate::{CacheClass, GateError};
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header::CACHE_CONTROL};

/// Map a gate error onto its terminal response.
///
/// Error responses under the admin prefix still carry a cache-control class
/// (always `private`), never a cookie, and never any detail beyond the
/// error's own display text. Collaborator failures are logged here and
/// surfaced as an opaque 5xx.
pub(crate) fn gate_error_response(err: GateError) -> Response {
    let (status, body) = match &err {
        GateError::TransportPolicyViolation => (StatusCode::FORBIDDEN, err.to_string()),
        GateError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        GateError::ValidationFailure => (StatusCode::FORBIDDEN, err.to_string()),
        GateError::Configuration(_) | GateError::Session(_) | GateError::Collaborator(_) => {
            tracing::error!("gate failure: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    private_error_response(status, body)
}

/// Terminal error body with the private cache class, for handlers that pick
/// the status themselves.
pub(crate) fn private_error_response(status: StatusCode, body: String) -> Response {
    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        CACHE_CONTROL,
        HeaderValue::from_static(CacheClass::Private.header_value()),
    );
    response
}
