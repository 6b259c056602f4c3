//! Bearer token acquisition and caching.
//!
//! API calls never talk to `/login` directly. They ask a [`TokenProvider`]
//! for a [`Token`], and the provider decides whether the cached token is
//! still usable. The production provider is [`Authenticator`], which
//! persists tokens through a [`TokenStore`] and measures their age with a
//! [`Clock`]. Both are swappable, so tests can run with an in-memory store
//! and a clock they control.

mod authenticator;
mod store;

pub use authenticator::{Authenticator, CredentialsFile};
pub use store::{FileTokenStore, MemoryTokenStore, StoredToken, TokenStore};

use async_trait::async_trait;
use std::time::{Duration, SystemTime};

use crate::error::Result;

/// An opaque bearer credential, sent verbatim in the `authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a usable token, logging in first if the cached one is stale.
    async fn acquire(&self) -> Result<Token>;

    /// Whether the cached token is missing or at least `threshold` old.
    fn is_stale(&self, threshold: Duration) -> bool;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: std::sync::Mutex<SystemTime>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: std::sync::Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A token written at `written_at` is expired once it is `ttl` old.
///
/// A write time in the future counts as age zero.
pub fn is_expired(written_at: SystemTime, now: SystemTime, ttl: Duration) -> bool {
    let age = now.duration_since(written_at).unwrap_or(Duration::ZERO);
    age >= ttl
}
