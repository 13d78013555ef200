use std::sync::Arc;

use admin_gate::Gate;

/// Shared state handed to the router: the gate plus whether the local
/// listener itself terminates TLS. When TLS is terminated by a reverse
/// proxy instead, leave this false and configure proxy trust on the gate.
#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<Gate>,
    pub transport_secure: bool,
}

impl GateState {
    pub fn new(gate: Gate, transport_secure: bool) -> Self {
        Self {
            gate: Arc::new(gate),
            transport_secure,
        }
    }
}
