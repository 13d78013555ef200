//! Content resolver collaborator
//!
//! The editor `/view/` alias needs one answer from the content subsystem:
//! the canonical public URL of a content item.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::GateError;

#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Canonical public URL for a content item, or `None` if no such item.
    async fn public_url(&self, post_id: &str) -> Result<Option<String>, GateError>;
}

/// In-memory resolver for demos and tests.
pub struct InMemoryContentResolver {
    posts: Mutex<HashMap<String, String>>,
}

impl InMemoryContentResolver {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(HashMap::new()),
        }
    }

    pub async fn publish(&self, post_id: &str, url: &str) {
        self.posts
            .lock()
            .await
            .insert(post_id.to_string(), url.to_string());
    }
}

impl Default for InMemoryContentResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentResolver for InMemoryContentResolver {
    async fn public_url(&self, post_id: &str) -> Result<Option<String>, GateError> {
        Ok(self.posts.lock().await.get(post_id).cloned())
    }
}
