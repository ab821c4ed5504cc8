//! Browser `localStorage`

use web_sys::Storage;

use super::{KeyValueStore, StorageError};

/// Key-value store backed by the browser origin's `localStorage`.
#[derive(Debug, Clone)]
pub struct WebStore {
    storage: Storage,
}

impl WebStore {
    /// Open the current window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or the
    /// browser has storage disabled.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(host_error)?
            .ok_or(StorageError::Unavailable)?;

        Ok(Self { storage })
    }
}

impl KeyValueStore for WebStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(host_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(host_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(host_error)
    }
}

fn host_error(error: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Host(format!("{error:?}"))
}
