//! Router for the admin area
//!
//! The legacy aliases and the editor `/view/` alias never reach a handler:
//! the gate middleware answers them directly. Routes exist only for pages
//! the gate forwards.

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::middleware::route_gate;
use crate::pages;
use crate::state::GateState;

/// Build the admin router with HTTP tracing.
pub fn admin_router(state: GateState) -> Router {
    admin_router_no_trace(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`admin_router`] without the tracing middleware, for hosts that
/// bring their own.
pub fn admin_router_no_trace(state: GateState) -> Router {
    Router::new()
        .route("/ghost/", get(pages::admin_shell))
        .route(
            "/ghost/signin/",
            get(pages::signin_page).post(pages::signin_submit),
        )
        .route("/ghost/signup/", get(pages::signup_page))
        .route("/ghost/signout/", get(pages::signout))
        .route("/ghost/forgotten/", get(pages::forgotten_page))
        .route("/ghost/reset/", get(pages::reset_root))
        .route("/ghost/reset/{token}/", get(pages::reset_link))
        .fallback(pages::not_found)
        .layer(from_fn_with_state(state.clone(), route_gate))
        .with_state(state)
}
