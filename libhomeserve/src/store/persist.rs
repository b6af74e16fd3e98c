//! Selective persistence
//!
//! Only the auth and user partitions survive a restart, and only their data:
//! `loading` and `error` always start fresh. Everything else comes back at its
//! initial value.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::state::RootState;
use crate::error::PersistError;
use crate::slices::{AuthState, UserState};
use crate::types::{Address, User};

/// Bumped whenever the snapshot layout changes; older snapshots are dropped
pub const SNAPSHOT_VERSION: u32 = 1;

/// Durable home for the persisted snapshot
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<String>, PersistError>;
    fn save(&self, snapshot: &str) -> Result<(), PersistError>;
    fn clear(&self) -> Result<(), PersistError>;
}

/// JSON file on disk
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Written to a sibling temp file and renamed into place, so a crash
    /// mid-write leaves the previous snapshot intact.
    fn save(&self, snapshot: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, snapshot)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.snapshot.lock().clone()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, PersistError> {
        Ok(self.contents())
    }

    fn save(&self, snapshot: &str) -> Result<(), PersistError> {
        *self.snapshot.lock() = Some(snapshot.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        *self.snapshot.lock() = None;
        Ok(())
    }
}

impl<S: StateStorage + ?Sized> StateStorage for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<String>, PersistError> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> Result<(), PersistError> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> Result<(), PersistError> {
        (**self).clear()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub awaiting_verification: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedUser {
    pub profile: Option<User>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    pub auth: PersistedAuth,
    pub user: PersistedUser,
}

impl PersistedState {
    pub fn capture(state: &RootState) -> Self {
        let auth = &state.auth;
        Self {
            version: SNAPSHOT_VERSION,
            auth: PersistedAuth {
                is_authenticated: auth.is_authenticated,
                user: auth.user.clone(),
                token: auth.token.clone(),
                refresh_token: auth.refresh_token.clone(),
                awaiting_verification: auth.awaiting_verification,
            },
            user: PersistedUser {
                profile: state.user.profile.clone(),
                addresses: state.user.addresses.clone(),
            },
        }
    }

    /// Merge into an otherwise default state tree
    pub fn restore(self) -> RootState {
        RootState {
            auth: AuthState {
                is_authenticated: self.auth.is_authenticated,
                user: self.auth.user,
                token: self.auth.token,
                refresh_token: self.auth.refresh_token,
                awaiting_verification: self.auth.awaiting_verification,
                ..AuthState::default()
            },
            user: UserState {
                profile: self.user.profile,
                addresses: self.user.addresses,
                ..UserState::default()
            },
            ..RootState::default()
        }
    }
}

/// Build the cold-start state from `storage`.
///
/// Never fails: an unreadable, corrupt or outdated snapshot is logged and
/// the default tree is returned instead.
pub fn rehydrate(storage: &dyn StateStorage) -> RootState {
    let raw = match storage.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return RootState::default(),
        Err(error) => {
            tracing::warn!(%error, "could not read persisted state, starting fresh");
            return RootState::default();
        }
    };

    match serde_json::from_str::<PersistedState>(&raw) {
        Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => {
            tracing::debug!(
                authenticated = snapshot.auth.is_authenticated,
                "restored persisted state"
            );
            snapshot.restore()
        }
        Ok(snapshot) => {
            tracing::warn!(
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "persisted state has another version, starting fresh"
            );
            RootState::default()
        }
        Err(error) => {
            tracing::warn!(%error, "persisted state is corrupt, starting fresh");
            RootState::default()
        }
    }
}

pub fn persist(storage: &dyn StateStorage, snapshot: &PersistedState) -> Result<(), PersistError> {
    let encoded = serde_json::to_string(snapshot)?;
    storage.save(&encoded)
}
