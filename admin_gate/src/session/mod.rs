mod cookie;
mod csrf;
mod errors;
mod store;
mod types;

pub use cookie::{
    clear_session_cookie, decode_cookie_value, encode_cookie_value, http_date,
    session_id_from_headers, set_session_cookie,
};
pub use csrf::{CSRF_HEADER, is_mutating, mint_csrf_token, verify_csrf_header};
pub use errors::SessionError;
pub use store::{InMemorySessionStore, SessionStore};
pub use types::{SessionId, StoredSession};
