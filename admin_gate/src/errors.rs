use thiserror::Error;

use crate::session::SessionError;

/// Startup-time configuration failures. The process must not begin serving
/// with an ambiguous security posture, so these are fatal.
#[derive(Debug, Error, Clone)]
pub enum ConfigError {
    #[error("Invalid TLS mode: {0}")]
    InvalidTlsMode(String),

    #[error("Missing secure origin: {0}")]
    MissingSecureOrigin(String),

    #[error("Invalid secure origin: {0}")]
    InvalidSecureOrigin(String),
}

/// Terminal per-request failures produced by the gate. Transport and auth
/// failures are never retried; collaborator failures surface as 5xx and are
/// logged by the integration layer.
#[derive(Debug, Error)]
pub enum GateError {
    /// Non-secure access to the admin area under reject mode.
    #[error("Access denied: secure connection required")]
    TransportPolicyViolation,

    /// Unknown resource under the admin prefix. The message is a stable
    /// human-readable marker that clients and tests can match on.
    #[error("Page Not Found")]
    NotFound,

    /// Bad credentials or CSRF mismatch. Deliberately generic: the message
    /// never reveals which input failed or whether an account exists.
    #[error("Validation failed")]
    ValidationFailure,

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Error from session or session-store operations
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// A collaborator (user directory, content resolver) was unreachable
    #[error("Collaborator failure: {0}")]
    Collaborator(String),
}
