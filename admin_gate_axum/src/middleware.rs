//! Gate middleware
//!
//! Runs the gate pipeline ahead of every route. Redirect directives are
//! answered here without touching the handlers; forwarded requests get the
//! session context attached as a request extension, and the response is
//! post-processed for cache class and session cookie.

use admin_gate::Directive;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::header::SET_COOKIE;

use crate::error::gate_error_response;
use crate::respond::{apply_cache_class, redirect_response, stamp_session_headers};
use crate::state::GateState;

/// Response headers the gate never allows out: the anti-forgery token must
/// only travel in page content, and no cache-invalidation signal is ever
/// sent to a client.
const STRIPPED_RESPONSE_HEADERS: [&str; 2] = ["x-csrf-token", "x-cache-invalidate"];

pub async fn route_gate(State(state): State<GateState>, mut req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let directive = state
        .gate
        .evaluate(
            &method,
            &path,
            query.as_deref(),
            req.headers(),
            state.transport_secure,
        )
        .await;

    let mut response = match directive {
        Ok(Directive::Redirect {
            status,
            location,
            cache,
            session,
        }) => redirect_response(status, &location, cache, session.as_ref()),
        Ok(Directive::Forward { session, cache }) => {
            if let Some(ctx) = &session {
                req.extensions_mut().insert(ctx.clone());
            }
            let mut response = next.run(req).await;
            apply_cache_class(&mut response, cache);
            if let Some(ctx) = session.filter(|ctx| ctx.fresh) {
                // Handlers that establish their own session (sign-in) already
                // set the cookie; don't fight them.
                if !response.headers().contains_key(SET_COOKIE) {
                    if let Err(e) = stamp_session_headers(
                        response.headers_mut(),
                        &ctx.session_id,
                        ctx.issued_at,
                        ctx.expires_at,
                    ) {
                        tracing::error!("Failed to set session cookie: {e}");
                        return gate_error_response(e.into());
                    }
                }
            }
            response
        }
        Err(err) => gate_error_response(err),
    };

    for name in STRIPPED_RESPONSE_HEADERS {
        response.headers_mut().remove(name);
    }
    response
}
