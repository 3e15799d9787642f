//! # Token Stores
//!
//! `FileTokenStore` persists the token set as a small JSON document so a
//! later run can resume the session; `MemoryTokenStore` keeps it in process.

use crate::domain::SessionError;
use crate::ports::outbound::TokenStore;
use parking_lot::Mutex;
use shared_types::entities::TokenSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// JSON file with `token` and `refreshToken` keys.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenSet>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Storage(e.to_string())),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SessionError::Storage(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, tokens: &TokenSet) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(tokens)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| SessionError::Storage(e.to_string()))?;

        debug!(path = %self.path.display(), "Tokens persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }
}

/// In-process token store. Counts writes so callers can assert on them.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenSet>>,
    writes: AtomicUsize,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tokens(tokens: TokenSet) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `save` and `clear` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<TokenSet> {
        self.tokens.lock().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<TokenSet>, SessionError> {
        Ok(self.tokens.lock().clone())
    }

    fn save(&self, tokens: &TokenSet) -> Result<(), SessionError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.tokens.lock() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.tokens.lock() = None;
        Ok(())
    }
}
