//! In-memory cookie jar with expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use portal_core::ports::{SessionStorage, StorageError};

struct Cookie {
    value: String,
    expires_at: Option<Instant>,
}

impl Cookie {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Cookie jar that enforces each cookie's max-age on read, the way a
/// browser drops expired cookies. A `None` TTL is a session cookie.
#[derive(Default)]
pub struct InMemoryCookieJar {
    cookies: RwLock<HashMap<String, Cookie>>,
}

impl InMemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired cookies. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut cookies = self.cookies.write().await;
        let before = cookies.len();
        cookies.retain(|_, c| !c.is_expired(now));
        before - cookies.len()
    }
}

#[async_trait]
impl SessionStorage for InMemoryCookieJar {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let now = Instant::now();
        let cookies = self.cookies.read().await;
        let Some(cookie) = cookies.get(key) else {
            return Ok(None);
        };

        if cookie.is_expired(now) {
            drop(cookies);
            tracing::debug!(cookie = key, "Cookie expired");
            self.cookies.write().await.remove(key);
            return Ok(None);
        }

        Ok(Some(cookie.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        let expires_at = ttl.map(|d| Instant::now() + d);
        self.cookies.write().await.insert(
            key.to_string(),
            Cookie {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.cookies.write().await.remove(key);
        Ok(())
    }
}
