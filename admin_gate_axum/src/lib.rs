//! Axum integration for the admin routing gate.
//!
//! Mount [`admin_router`] (or [`admin_router_no_trace`]) on the host
//! application; every request flows through the gate middleware before any
//! handler runs.

mod error;
mod middleware;
mod pages;
mod respond;
mod router;
mod state;

pub use middleware::route_gate;
pub use router::{admin_router, admin_router_no_trace};
pub use state::GateState;
