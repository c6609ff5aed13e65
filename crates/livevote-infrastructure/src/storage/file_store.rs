//! File-backed key-value store.
//!
//! One file per key under a directory. Each write goes to its own uniquely
//! named temporary file that is synced and renamed over the target, so
//! readers in other processes see either the old or the new value, never a
//! torn one. There is no locking: concurrent writers race and the last
//! rename wins.

use std::fs;
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

use livevote_core::error::{LiveVoteError, Result};
use livevote_core::storage::KeyValueStore;
use tempfile::NamedTempFile;

/// A directory acting as local storage.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        // Ensure parent directory exists
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Next to the target so the rename stays on one filesystem
        let mut tmp_file = NamedTempFile::new_in(&self.dir)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.as_file().sync_all()?;

        // Atomic rename
        tmp_file.persist(&path).map_err(|e| e.error)?;

        tracing::trace!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(LiveVoteError::storage(format!("invalid key '{}'", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livevote_core::storage::{SESSION_DOCUMENT_KEY, VOTE_RECORD_KEY};
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("store"));

        assert_eq!(store.get(SESSION_DOCUMENT_KEY).unwrap(), None);

        store.set(SESSION_DOCUMENT_KEY, r#"{"participants":[]}"#).unwrap();
        assert_eq!(
            store.get(SESSION_DOCUMENT_KEY).unwrap().as_deref(),
            Some(r#"{"participants":[]}"#)
        );
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());

        store.set(VOTE_RECORD_KEY, "a").unwrap();
        store.set(VOTE_RECORD_KEY, "b").unwrap();

        assert_eq!(store.get(VOTE_RECORD_KEY).unwrap().as_deref(), Some("b"));
        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(VOTE_RECORD_KEY)]);
    }

    #[test]
    fn test_concurrent_writers_never_tear() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();
        FileKeyValueStore::new(&dir)
            .set(SESSION_DOCUMENT_KEY, &"A".repeat(256 * 1024))
            .unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let writers: Vec<_> = ['A', 'B']
            .into_iter()
            .map(|fill| {
                let store = FileKeyValueStore::new(&dir);
                thread::spawn(move || {
                    let value = fill.to_string().repeat(256 * 1024);
                    for _ in 0..200 {
                        store.set(SESSION_DOCUMENT_KEY, &value).unwrap();
                    }
                })
            })
            .collect();

        let reader = {
            let store = FileKeyValueStore::new(&dir);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    let value = store.get(SESSION_DOCUMENT_KEY).unwrap().unwrap();
                    assert_eq!(value.len(), 256 * 1024, "torn read");
                    let first = value.as_bytes()[0];
                    assert!(value.bytes().all(|b| b == first), "mixed read");
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::SeqCst);
        reader.join().unwrap();
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());

        store.remove(VOTE_RECORD_KEY).unwrap();
        store.set(VOTE_RECORD_KEY, "a").unwrap();
        store.remove(VOTE_RECORD_KEY).unwrap();
        assert_eq!(store.get(VOTE_RECORD_KEY).unwrap(), None);
    }

    #[test]
    fn test_two_handles_share_state() {
        let temp_dir = TempDir::new().unwrap();
        let first = FileKeyValueStore::new(temp_dir.path());
        let second = FileKeyValueStore::new(temp_dir.path());

        first.set("k", "1").unwrap();
        second.set("k", "2").unwrap();
        assert_eq!(first.get("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(store.set(key, "x").is_err(), "{key:?}");
        }
    }
}
