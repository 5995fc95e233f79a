//! Client session store.
//!
//! Holds the signed-in user's token, role and username, persisted as three
//! string keys in a [`SessionStorage`] backend. Every write is broadcast as a
//! [`SessionEvent`] so the shell and views can react without polling.
//!
//! There is no expiry or refresh logic: an expired token only shows up as a
//! failed request.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use tokio::sync::broadcast;

use crate::models::Role;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const USERNAME_KEY: &str = "username";

const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, ROLE_KEY, USERNAME_KEY];

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 16;

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Session lock poisoned")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Storage backends
// ═══════════════════════════════════════════════════════════

/// Persistent string key/value storage, the analogue of browser local storage.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;

    /// Write several keys as one change: either all of them land or the
    /// previous values are put back.
    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), SessionError> {
        let mut previous = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let before = match self.get(key) {
                Ok(before) => before,
                Err(e) => {
                    restore(self, &previous);
                    return Err(e);
                }
            };
            previous.push((*key, before));
            if let Err(e) = self.set(key, value) {
                restore(self, &previous);
                return Err(e);
            }
        }
        Ok(())
    }
}

fn restore<S: SessionStorage + ?Sized>(storage: &S, previous: &[(&str, Option<String>)]) {
    for (key, before) in previous.iter().rev() {
        let undone = match before {
            Some(value) => storage.set(key, value),
            None => storage.remove(key),
        };
        if let Err(e) = undone {
            tracing::warn!(key, error = %e, "Session rollback incomplete");
        }
    }
}

/// Volatile storage; nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn set_entries(&self, pairs: &[(&str, &str)]) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        for (key, value) in pairs {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change.
///
/// Writes go to a sibling temp file first and are renamed into place so a
/// crash never leaves a half-written session file.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    /// One flush for the whole batch; memory changes only once it is on disk.
    fn set_entries(&self, pairs: &[(&str, &str)]) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        let mut next = entries.clone();
        for (key, value) in pairs {
            next.insert(key.to_string(), value.to_string());
        }
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Session snapshot + events
// ═══════════════════════════════════════════════════════════

/// Snapshot of the three session fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Role of a signed-in user; `None` when signed out.
    pub fn active_role(&self) -> Option<Role> {
        self.token.as_ref().and(self.role)
    }
}

/// Change notification broadcast by [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { role: Role, username: String },
    SignedOut,
}

// ═══════════════════════════════════════════════════════════
// SessionStore
// ═══════════════════════════════════════════════════════════

/// Single writer of the persisted session.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    current: RwLock<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Load the persisted session.
    ///
    /// With no token present, any leftover role/username keys are removed.
    /// An unparseable role is treated as absent.
    pub fn open(storage: Box<dyn SessionStorage>) -> Result<Self, SessionError> {
        let token = storage.get(TOKEN_KEY)?;
        let session = if token.is_some() {
            let role = storage.get(ROLE_KEY)?.and_then(|raw| match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring stored role");
                    None
                }
            });
            Session {
                token,
                role,
                username: storage.get(USERNAME_KEY)?,
            }
        } else {
            for key in SESSION_KEYS {
                storage.remove(key)?;
            }
            Session::default()
        };

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            storage,
            current: RwLock::new(session),
            events,
        })
    }

    /// Store backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage: Box::new(MemoryStorage::new()),
            current: RwLock::new(Session::default()),
            events,
        }
    }

    /// Store backed by a [`FileStorage`] at `path`.
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        Self::open(Box::new(FileStorage::open(path)?))
    }

    /// Persist a new session and broadcast [`SessionEvent::SignedIn`].
    pub fn set_session(&self, token: &str, role: Role, username: &str) -> Result<(), SessionError> {
        self.storage.set_entries(&[
            (TOKEN_KEY, token),
            (ROLE_KEY, role.as_str()),
            (USERNAME_KEY, username),
        ])?;

        {
            let mut current = self.current.write().map_err(|_| SessionError::LockPoisoned)?;
            *current = Session {
                token: Some(token.to_string()),
                role: Some(role),
                username: Some(username.to_string()),
            };
        }

        tracing::info!(%role, username, "Session started");
        self.notify(SessionEvent::SignedIn {
            role,
            username: username.to_string(),
        });
        Ok(())
    }

    /// Remove all three keys and broadcast [`SessionEvent::SignedOut`].
    pub fn clear(&self) -> Result<(), SessionError> {
        for key in SESSION_KEYS {
            self.storage.remove(key)?;
        }
        {
            let mut current = self.current.write().map_err(|_| SessionError::LockPoisoned)?;
            *current = Session::default();
        }
        tracing::info!("Session cleared");
        self.notify(SessionEvent::SignedOut);
        Ok(())
    }

    /// Synchronous snapshot of the current session.
    pub fn current(&self) -> Session {
        self.current
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn token(&self) -> Option<String> {
        self.current().token
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
