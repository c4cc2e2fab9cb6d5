use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// Key/value store backed by a single JSON object on disk.
///
/// The whole map is cached in memory and the file is rewritten after every
/// mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = read_entries(&path);
        debug!(path = %path.display(), entries = entries.len(), "opened progress file");
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file in one step: write a sibling temp file, then rename
    /// it over the original so a crash never leaves half-written JSON.
    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        if let Err(err) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_else(|| OsStr::new("progress")));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot read progress file, starting empty");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "progress file is corrupt, starting empty");
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value);
        }
        self.flush()
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        let before = self.entries.len();
        self.entries.retain(|key, _| !keys.contains(&key.as_str()));
        if self.entries.len() != before {
            self.flush()?;
        }
        Ok(())
    }
}
