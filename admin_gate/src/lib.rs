//! Routing gate for the admin area.
//!
//! For every request under the admin prefix the gate decides whether the
//! request may proceed, must be redirected, or must be rejected, based on
//! transport security, session authentication state, and anti-forgery token
//! validity. It also resolves the deprecated top-level aliases and selects
//! the cache-control policy for every terminal response.
//!
//! The evaluation order is fixed: TLS enforcement, legacy alias resolution,
//! authentication state, CSRF validation for mutating methods, cache-control
//! selection. The first stage to produce a terminal outcome wins.
//!
//! Content rendering, user storage, and the public router are external
//! collaborators reached through the [`SessionStore`], [`UserDirectory`] and
//! [`ContentResolver`] traits; implementations are injected into [`Gate`].

mod cache;
mod config;
mod content;
mod errors;
mod gate;
mod legacy;
mod session;
mod transport;
mod users;
mod utils;

pub use cache::CacheClass;
pub use config::{
    ADMIN_PREFIX, FORGOTTEN_PATH, GateConfig, RESET_PATH, SESSION_COOKIE_MAX_AGE,
    SESSION_COOKIE_NAME, SESSION_TTL_HOURS, SIGNIN_PATH, SIGNOUT_PATH, SIGNUP_PATH, TlsPolicy,
    parse_secure_origin,
};
pub use content::{ContentResolver, InMemoryContentResolver};
pub use errors::{ConfigError, GateError};
pub use gate::{Directive, Gate, RouteClass, SessionContext};
pub use legacy::resolve_legacy_alias;
pub use session::{
    CSRF_HEADER, InMemorySessionStore, SessionError, SessionId, SessionStore, StoredSession,
    clear_session_cookie, encode_cookie_value, http_date, session_id_from_headers,
    set_session_cookie,
};
pub use transport::{TlsDecision, enforce, request_is_secure};
pub use users::{InMemoryUserDirectory, UserDirectory};
pub use utils::gen_random_string;
