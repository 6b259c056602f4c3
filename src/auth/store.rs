//! Token persistence.
//!
//! [`FileTokenStore`] keeps the raw token text in a single file and uses the
//! file's modification time as the write time, so the cache survives across
//! runs. No locking is done: two processes refreshing at once may overwrite
//! each other's token.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use super::{Clock, Token};
use crate::error::Result;

/// A cached token and the moment it was written.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub token: Token,
    pub written_at: SystemTime,
}

pub trait TokenStore: Send + Sync {
    /// Returns `None` when nothing has been cached yet.
    fn load(&self) -> Result<Option<StoredToken>>;

    fn save(&self, token: &Token) -> Result<()>;
}

/// Token cache backed by a text file, `auth-token.txt` by default.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let written_at = fs::metadata(&self.path)?.modified()?;
        let content = fs::read_to_string(&self.path)?;
        let value = content.trim_end();
        if value.is_empty() {
            return Ok(None);
        }

        Ok(Some(StoredToken {
            token: Token::new(value),
            written_at,
        }))
    }

    fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token.as_str())?;
        Ok(())
    }
}

/// Token cache that lives only as long as the process.
///
/// Write times come from the supplied clock.
pub struct MemoryTokenStore {
    slot: Mutex<Option<StoredToken>>,
    clock: Arc<dyn Clock>,
}

impl MemoryTokenStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            clock,
        }
    }

    /// Seeds the store with a token written at a given time.
    pub fn insert(&self, token: Token, written_at: SystemTime) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(StoredToken { token, written_at });
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredToken>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, token: &Token) -> Result<()> {
        self.insert(token.clone(), self.clock.now());
        Ok(())
    }
}
