//! Durable key-value storage for the session slots

use crate::config::AuthConfig;
use agendify_core::{CoreError, CoreResult, Identity};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// String slots that survive restarts
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Process-local storage, used in tests and for one-shot sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> CoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| CoreError::storage("memory storage lock poisoned"))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file
///
/// Every write replaces the file through a temporary sibling and a rename,
/// so a crash never leaves a half-written session behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> CoreResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> CoreResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(slots)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> CoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::storage("file storage lock poisoned"))?;
        let mut slots = self.read_slots()?;
        apply(&mut slots);
        self.write_slots(&slots)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.update(|slots| {
            slots.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.update(|slots| {
            slots.remove(key);
        })
    }
}

/// The two session slots read and written as a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub credential: String,
    pub identity: Identity,
}

impl StoredSession {
    /// Read both slots; `None` unless both are present and the identity parses
    pub fn load(storage: &dyn SessionStorage) -> CoreResult<Option<Self>> {
        let credential = storage.get(AuthConfig::TOKEN_KEY)?;
        let identity = storage.get(AuthConfig::USER_KEY)?;

        let (Some(credential), Some(identity)) = (credential, identity) else {
            return Ok(None);
        };
        if credential.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Identity>(&identity) {
            Ok(identity) => Ok(Some(Self {
                credential,
                identity,
            })),
            Err(e) => {
                debug!(error = %e, "stored identity does not parse");
                Ok(None)
            }
        }
    }

    pub fn save(&self, storage: &dyn SessionStorage) -> CoreResult<()> {
        storage.set(AuthConfig::TOKEN_KEY, &self.credential)?;
        storage.set(AuthConfig::USER_KEY, &serde_json::to_string(&self.identity)?)
    }

    /// Remove both slots
    pub fn clear(storage: &dyn SessionStorage) -> CoreResult<()> {
        let token = storage.remove(AuthConfig::TOKEN_KEY);
        let user = storage.remove(AuthConfig::USER_KEY);
        token.and(user)
    }
}
