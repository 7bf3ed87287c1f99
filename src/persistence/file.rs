//! File-backed store: one `<key>` file per document in a data directory

use std::fs;
use std::io;
use std::path::PathBuf;

use super::{PersistError, Store};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a data directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Store for FileStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `<key>.tmp`, then rename over the old file
    fn write_raw(&self, key: &str, contents: &str) -> Result<(), PersistError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{read_json, write_json};

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");
        assert!(store.read_raw("leaderboard.json").expect("read").is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path().join("nested")).expect("open");
        write_json(&store, "scores.json", &vec![("ABC", 3u32)]).expect("write");
        assert!(store.path_for("scores.json").exists());
        assert!(!dir.path().join("nested/scores.json.tmp").exists());

        let back: Option<Vec<(String, u32)>> = read_json(&store, "scores.json").expect("read");
        assert_eq!(back, Some(vec![("ABC".to_string(), 3)]));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");
        store.write_raw("a.json", "[]").expect("write");
        store.remove("a.json").expect("remove");
        store.remove("a.json").expect("remove again");
        assert!(store.read_raw("a.json").expect("read").is_none());
    }
}
