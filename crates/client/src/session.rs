//! Session store: the authenticated identity and its bearer token.
//!
//! The store is the only writer of session state. Everything else receives a
//! [`Session`] snapshot and treats the token as read-only.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use loanportal_core::User;

const TOKEN_ENTRY: &str = "authToken";
const USER_ENTRY: &str = "user.json";

/// Bearer token issued at login. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Authenticated identity plus credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: AuthToken,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage failed at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait SessionStore: Send + Sync {
    /// Current session, or `None` when absent or unreadable.
    ///
    /// Unreadable state is cleared as a side effect.
    fn load(&self) -> Option<Session>;

    /// Persist both the identity and the token.
    fn save(&self, user: &User, token: &AuthToken) -> Result<(), SessionError>;

    /// Remove both entries. Idempotent.
    fn clear(&self) -> Result<(), SessionError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────────────────────────────────────

/// Session persisted as two entries in a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_ENTRY)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_ENTRY)
    }

    fn read_entry(path: &Path) -> Result<Option<String>, io::Error> {
        match std::fs::read_to_string(path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn parse(token: Option<String>, user: Option<String>) -> Result<Option<Session>, String> {
        match (token, user) {
            (None, None) => Ok(None),
            (Some(_), None) => Err("token present without user".to_string()),
            (None, Some(_)) => Err("user present without token".to_string()),
            (Some(token), Some(user)) => {
                let token = token.trim();
                if token.is_empty() {
                    return Err("empty token".to_string());
                }
                let user: User =
                    serde_json::from_str(&user).map_err(|e| format!("invalid user entry: {e}"))?;
                Ok(Some(Session {
                    user,
                    token: AuthToken::new(token),
                }))
            }
        }
    }

    fn heal(&self, reason: &str) {
        tracing::warn!(dir = ?self.dir, reason, "discarding corrupted session");
        if let Err(err) = self.clear() {
            tracing::error!("failed to clear corrupted session: {err}");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let entries = Self::read_entry(&self.token_path())
            .and_then(|token| Ok((token, Self::read_entry(&self.user_path())?)));

        let (token, user) = match entries {
            Ok(entries) => entries,
            Err(err) => {
                self.heal(&format!("unreadable session entry: {err}"));
                return None;
            }
        };

        match Self::parse(token, user) {
            Ok(session) => session,
            Err(reason) => {
                self.heal(&reason);
                None
            }
        }
    }

    fn save(&self, user: &User, token: &AuthToken) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SessionError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let user_json = serde_json::to_string(user)?;

        let token_path = self.token_path();
        write_atomic(&token_path, token.as_str())?;

        if let Err(err) = write_atomic(&self.user_path(), &user_json) {
            // Never leave a token behind without its identity.
            let _ = std::fs::remove_file(&token_path);
            return Err(err);
        }

        tracing::debug!(email = %user.email, role = %user.role, "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        for path in [self.token_path(), self.user_path()] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(SessionError::Io { path, source }),
            }
        }
        Ok(())
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(path: &Path, contents: &str) -> Result<(), SessionError> {
    let io_err = |source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    };

    let tmp = path.with_extension("tmp");
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    std::fs::rename(&tmp, path).map_err(io_err)
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local session (tests, one-shot tools).
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(user: User, token: AuthToken) -> Self {
        Self {
            inner: Mutex::new(Some(Session { user, token })),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn save(&self, user: &User, token: &AuthToken) -> Result<(), SessionError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(Session {
            user: user.clone(),
            token: token.clone(),
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
