//! Session token store.
//!
//! The console keeps exactly one piece of client-side state: the bearer
//! token. It lives behind [`SessionStore`] and is handed explicitly to the
//! HTTP client and the route guard.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of a stored token unless configured otherwise.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Session store errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock poisoned")]
    Poisoned,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Holder of the single authentication token.
pub trait SessionStore: Send + Sync {
    /// Current token, if one is stored and still valid.
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> SessionResult<()>;

    fn clear_token(&self) -> SessionResult<()>;

    fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) -> SessionResult<()> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> SessionResult<()> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// On-disk contents of a [`FileSessionStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct StoredSession {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Token persisted to a single JSON file with an expiry, cookie-style.
///
/// Expired or unreadable files read as "no token".
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    ttl: Duration,
}

impl FileSessionStore {
    /// Store at `path` with the default seven-day lifetime.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_ttl(path, Duration::days(DEFAULT_SESSION_TTL_DAYS))
    }

    pub fn with_ttl<P: AsRef<Path>>(path: P, ttl: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> SessionResult<Option<StoredSession>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        match self.read() {
            Ok(Some(stored)) if stored.expires_at > Utc::now() => Some(stored.token),
            Ok(Some(_)) => {
                tracing::debug!(path = %self.path.display(), "Stored session expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring unreadable session file: {e}");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> SessionResult<()> {
        let stored = StoredSession {
            token: token.to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_private(&self.path, serde_json::to_string(&stored)?.as_bytes())?;
        tracing::info!(path = %self.path.display(), "Session token stored");
        Ok(())
    }

    fn clear_token(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `contents` readable by the owner only.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // mode() only applies when the file is created
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.flush()
}
