//! JSON persistence for leaderboards and settings
//!
//! Features:
//! - Key/value `Store` abstraction (one JSON document per key)
//! - Native file store with write-to-temp-then-rename
//! - LocalStorage store on the web
//! - In-memory store for tests and headless runs

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage failures
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Backend cannot be reached (e.g. LocalStorage disabled)
    Unavailable(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "storage I/O error: {e}"),
            Self::Json(e) => write!(f, "malformed JSON: {e}"),
            Self::Unavailable(why) => write!(f, "storage unavailable: {why}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// A place to keep small JSON documents by key
pub trait Store {
    /// Raw document for `key`, or `None` if nothing was stored yet
    fn read_raw(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn write_raw(&self, key: &str, contents: &str) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// Read and decode a JSON document
pub fn read_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Result<Option<T>, PersistError> {
    match store.read_raw(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON document
pub fn write_json<T: Serialize>(store: &dyn Store, key: &str, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(value)?;
    store.write_raw(key, &json)
}

/// Volatile store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.docs.borrow().get(key).cloned())
    }

    fn write_raw(&self, key: &str, contents: &str) -> Result<(), PersistError> {
        self.docs.borrow_mut().insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.docs.borrow_mut().remove(key);
        Ok(())
    }
}
