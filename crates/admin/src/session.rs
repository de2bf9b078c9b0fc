//! Admin session storage.
//!
//! The admin session is nothing more than a bearer token kept on the
//! operator's machine. It is written at login, read by every authenticated
//! request and removed at logout; it never expires client-side.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lockshop_client::SessionToken;
use thiserror::Error;

/// Keys used in the session file.
pub mod keys {
    /// Key under which the admin bearer token is stored.
    pub const ADMIN_TOKEN: &str = "adminToken";
}

/// Errors reading or writing the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the admin token lives.
///
/// Injected into the console so tests can swap the file for memory.
pub trait SessionStore: Send + Sync {
    /// The stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the store exists but can't be read.
    fn load(&self) -> Result<Option<SessionToken>, SessionError>;

    /// Store a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the store can't be written.
    fn save(&self, token: &SessionToken) -> Result<(), SessionError>;

    /// Forget the token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the store can't be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Token kept in a small JSON object on disk, e.g.
/// `{"adminToken": "eyJ..."}`.
///
/// Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(map).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        Ok(self
            .read_map()?
            .get(keys::ADMIN_TOKEN)
            .and_then(|raw| SessionToken::new(raw)))
    }

    fn save(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut map = self.read_map()?;
        map.insert(keys::ADMIN_TOKEN.to_owned(), token.expose().to_owned());
        self.write_map(&map)?;
        tracing::info!(path = %self.path.display(), "Admin session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut map = self.read_map()?;
        if map.remove(keys::ADMIN_TOKEN).is_some() {
            self.write_map(&map)?;
        }
        tracing::info!(path = %self.path.display(), "Admin session cleared");
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    #[must_use]
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SessionToken>> {
        // A poisoned lock still holds a usable Option.
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionToken>, SessionError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &SessionToken) -> Result<(), SessionError> {
        *self.slot() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}
