//! Durable key/value backing store.
//!
//! Every record (events, tags, accounts) lives under a single string key and
//! is stored as a JSON document. `FileStorage` keeps one file per key inside
//! the data directory; `MemoryStorage` keeps them in a map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ScheduleError, ScheduleResult};

pub trait Storage {
    /// Raw contents stored under `key`, or `None` if nothing was written yet.
    fn read(&self, key: &str) -> ScheduleResult<Option<String>>;

    fn write(&self, key: &str, value: &str) -> ScheduleResult<()>;

    fn remove(&self, key: &str) -> ScheduleResult<()>;
}

/// One `<key>.json` file per record inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> ScheduleResult<Option<String>> {
        let path = self.path(key);

        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ScheduleError::Storage(format!("Could not read {}: {e}", path.display())))
    }

    fn write(&self, key: &str, value: &str) -> ScheduleResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ScheduleError::Storage(format!("Could not create {}: {e}", self.dir.display()))
        })?;

        let path = self.path(key);
        let temp = self.dir.join(format!("{}.json.tmp", key));

        std::fs::write(&temp, value)
            .and_then(|_| std::fs::rename(&temp, &path))
            .map_err(|e| ScheduleError::Storage(format!("Could not write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> ScheduleResult<()> {
        let path = self.path(key);

        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                ScheduleError::Storage(format!("Could not remove {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }
}

/// Parse the JSON document under `key`. Read and parse failures are errors.
pub(crate) fn read_json(storage: &dyn Storage, key: &str) -> ScheduleResult<Option<Value>> {
    match storage.read(key)? {
        Some(content) => serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ScheduleError::Storage(format!("Record '{key}' is corrupt: {e}"))),
        None => Ok(None),
    }
}

/// In-process storage, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> ScheduleResult<Option<String>> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> ScheduleResult<()> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ScheduleResult<()> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}

/// Memory storage whose next `n` reads fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FlakyStorage {
    inner: MemoryStorage,
    failing_reads: std::cell::Cell<usize>,
}

#[cfg(test)]
impl FlakyStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_reads(&self, n: usize) {
        self.failing_reads.set(n);
    }
}

#[cfg(test)]
impl Storage for FlakyStorage {
    fn read(&self, key: &str) -> ScheduleResult<Option<String>> {
        let remaining = self.failing_reads.get();
        if remaining > 0 {
            self.failing_reads.set(remaining - 1);
            return Err(ScheduleError::Storage(format!("Could not read {key}: disk error")));
        }
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> ScheduleResult<()> {
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> ScheduleResult<()> {
        self.inner.remove(key)
    }
}
