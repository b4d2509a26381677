//! File-based progress storage for Chronoscape.
//!
//! All keys live in one JSON object file, by default
//! `~/.chronoscape/progress.json`. The file is read once at construction and
//! every mutation writes the whole map back atomically via the temp file +
//! rename pattern. A malformed file is logged and treated as empty rather
//! than blocking the session.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{ChronoscapeError, FailOpen, Result};
use crate::storage::StateStore;

/// File-backed state store.
///
/// Keeps an in-memory cache of the key-value map; reads are served from the
/// cache and writes go through to disk before the call returns.
#[derive(Debug)]
pub struct FileStateStore {
    /// Path of the JSON progress file.
    path: PathBuf,
    /// Cached contents of the file.
    cache: RwLock<HashMap<String, String>>,
}

impl FileStateStore {
    /// Open a store at the given path, creating parent directories as needed.
    ///
    /// A missing file starts empty; a malformed file is logged and also
    /// starts empty, and is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ChronoscapeError::storage(parent, e))?;
            }
        }

        let cache = Self::read_map(&path).fail_open_default("reading progress file");

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// The path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "progress.json".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn read_map(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path).map_err(|e| ChronoscapeError::storage(path, e))?;
        let map: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(map)
    }

    /// Write the whole map atomically using temp file + rename.
    fn atomic_write(&self, map: &HashMap<String, String>) -> Result<()> {
        let temp_path = self.temp_path();
        let json = serde_json::to_string_pretty(map)?;

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| ChronoscapeError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| ChronoscapeError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| ChronoscapeError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &self.path).map_err(|e| ChronoscapeError::storage(&self.path, e))?;

        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let cache = self.cache.read().unwrap();
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut cache = self.cache.write().unwrap();
        cache.insert(key.to_string(), value.to_string());
        self.atomic_write(&cache)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut cache = self.cache.write().unwrap();
        if cache.remove(key).is_some() {
            self.atomic_write(&cache)?;
        }
        Ok(())
    }
}
