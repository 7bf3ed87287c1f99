//! Browser LocalStorage store

use super::{PersistError, Store};

/// Keys are namespaced so several games can share an origin
const KEY_PREFIX: &str = "special_day.";

#[derive(Debug, Clone, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .ok_or_else(|| PersistError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| PersistError::Unavailable("LocalStorage disabled".into()))
    }
}

impl Store for LocalStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, PersistError> {
        Self::storage()?
            .get_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
    }

    fn write_raw(&self, key: &str, contents: &str) -> Result<(), PersistError> {
        Self::storage()?
            .set_item(&format!("{KEY_PREFIX}{key}"), contents)
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        Self::storage()?
            .remove_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
    }
}
