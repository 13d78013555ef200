use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SESSION_TTL_HOURS;

/// Opaque session identifier carried by the signed cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A session as persisted in the store.
///
/// `user_id` of `None` means anonymous: pre-auth visitors still get a
/// session so that the CSRF token minted on the entry page can be matched
/// against the eventual sign-in submission. The CSRF token is only valid
/// for requests carrying this session's identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: Option<String>,
    pub csrf_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(user_id: Option<String>, csrf_token: String, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            csrf_token,
            created_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn anonymous(csrf_token: String, now: DateTime<Utc>) -> Self {
        Self::new(None, csrf_token, now)
    }

    pub fn authenticated(user_id: String, csrf_token: String, now: DateTime<Utc>) -> Self {
        Self::new(Some(user_id), csrf_token, now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
