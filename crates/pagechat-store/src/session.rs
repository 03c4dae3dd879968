//! Session store — best-effort persistence of the panel's credential and
//! conversation history.
//!
//! Read failures are logged and treated as "no prior state"; write failures
//! are logged and dropped. Nothing here is ever surfaced to the user.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use pagechat_core::{Credential, Result};

use crate::types::{ConversationTurn, SessionSnapshot};

/// Persistence surface used by the conversation controller.
pub trait SessionStore: Send + Sync {
    /// Restore prior state; empty on any failure.
    fn load(&self) -> SessionSnapshot;
    /// Replace the stored history.
    fn save(&self, history: &[ConversationTurn]);
    /// Replace the stored credential.
    fn save_credential(&self, credential: &Credential);
    /// Forget the stored credential.
    fn clear_credential(&self);
}

/// In-process store for tests and ephemeral panels.
#[derive(Default)]
pub struct MemorySessionStore {
    snapshot: Mutex<SessionSnapshot>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `snapshot`.
    pub fn with_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionSnapshot {
        self.snapshot.lock().clone()
    }

    fn save(&self, history: &[ConversationTurn]) {
        self.snapshot.lock().history = Some(history.to_vec());
    }

    fn save_credential(&self, credential: &Credential) {
        self.snapshot.lock().credential = Some(credential.clone());
    }

    fn clear_credential(&self) {
        self.snapshot.lock().credential = None;
    }
}

/// Store backed by a single JSON object on disk.
pub struct JsonSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonSessionStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SessionSnapshot> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SessionSnapshot::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    fn write(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        Ok(())
    }

    fn read_or_default(&self) -> SessionSnapshot {
        self.read().unwrap_or_else(|e| {
            warn!("Ignoring unreadable session {}: {}", self.path.display(), e);
            SessionSnapshot::default()
        })
    }

    fn update(&self, apply: impl FnOnce(&mut SessionSnapshot)) {
        let _guard = self.lock.lock();
        let mut snapshot = self.read_or_default();
        apply(&mut snapshot);
        if let Err(e) = self.write(&snapshot) {
            warn!("Failed to save session {}: {}", self.path.display(), e);
        }
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> SessionSnapshot {
        let _guard = self.lock.lock();
        let snapshot = self.read_or_default();
        debug!(
            "Loaded session: credential={}, {} turns",
            snapshot.credential.is_some(),
            snapshot.history.as_ref().map_or(0, |h| h.len())
        );
        snapshot
    }

    fn save(&self, history: &[ConversationTurn]) {
        self.update(|s| s.history = Some(history.to_vec()));
    }

    fn save_credential(&self, credential: &Credential) {
        self.update(|s| s.credential = Some(credential.clone()));
    }

    fn clear_credential(&self) {
        self.update(|s| s.credential = None);
    }
}
