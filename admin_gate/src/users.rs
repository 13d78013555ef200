//! User directory collaborator
//!
//! The gate consumes exactly two queries from the user subsystem: whether
//! any administrative user has been provisioned, and whether a credential
//! pair identifies one. User storage and password policy live elsewhere.

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use crate::errors::GateError;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Has at least one administrative user been created? Queried live on
    /// every request because it changes during initial setup.
    async fn has_admin_user(&self) -> Result<bool, GateError>;

    /// Validate a credential pair, returning the user id on success. `None`
    /// covers both unknown identification and wrong secret so callers cannot
    /// distinguish them.
    async fn verify_credentials(
        &self,
        identification: &str,
        secret: &str,
    ) -> Result<Option<String>, GateError>;
}

struct AdminUser {
    id: String,
    identification: String,
    secret: String,
}

/// In-memory directory for demos and tests.
pub struct InMemoryUserDirectory {
    users: Mutex<Vec<AdminUser>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }

    /// Provision a user, returning its id.
    pub async fn create_user(&self, identification: &str, secret: &str) -> String {
        let mut users = self.users.lock().await;
        let id = (users.len() + 1).to_string();
        users.push(AdminUser {
            id: id.clone(),
            identification: identification.to_string(),
            secret: secret.to_string(),
        });
        tracing::debug!("Provisioned admin user {id}");
        id
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn has_admin_user(&self) -> Result<bool, GateError> {
        Ok(!self.users.lock().await.is_empty())
    }

    async fn verify_credentials(
        &self,
        identification: &str,
        secret: &str,
    ) -> Result<Option<String>, GateError> {
        let users = self.users.lock().await;
        for user in users.iter() {
            let ident_ok: bool = user
                .identification
                .as_bytes()
                .ct_eq(identification.as_bytes())
                .into();
            let secret_ok: bool = user.secret.as_bytes().ct_eq(secret.as_bytes()).into();
            if ident_ok && secret_ok {
                return Ok(Some(user.id.clone()));
            }
        }
        Ok(None)
    }
}
