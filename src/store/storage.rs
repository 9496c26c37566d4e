use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{ Arc, Mutex };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        found: u32,
        supported: u32,
    },
    #[error("invalid storage namespace '{0}'")]
    InvalidNamespace(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Durable key/value storage for serialized state, keyed by namespace.
pub trait StateStorage: Send + Sync {
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, namespace: &str, payload: &str) -> Result<(), StorageError>;
    fn remove(&self, namespace: &str) -> Result<(), StorageError>;
}

/// One JSON file per namespace inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, namespace: &str) -> Result<PathBuf, StorageError> {
        let valid = !namespace.is_empty() &&
            namespace.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidNamespace(namespace.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", namespace)))
    }
}

impl StateStorage for FileStorage {
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(namespace)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn save(&self, namespace: &str, payload: &str) -> Result<(), StorageError> {
        let path = self.path_for(namespace)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        // Write-then-rename so a crash never leaves a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Persisted {} bytes to {}", payload.len(), path.display());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<(), StorageError> {
        let path = self.path_for(namespace)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// Process-local storage. Clones share the same map, which lets tests
/// "reload" a store from what a previous instance wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, namespace: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(namespace).cloned())
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(namespace).cloned())
    }

    fn save(&self, namespace: &str, payload: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(namespace.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(namespace);
        Ok(())
    }
}
