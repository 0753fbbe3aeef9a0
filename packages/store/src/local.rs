//! # Browser `localStorage` store
//!
//! [`LocalStore`] is the [`KeyValueStore`] used on the **web platform**. It is a
//! thin wrapper over `window.localStorage`, which is where the
//! invoicing pages expect to find the cached `billwise_user` record.
//!
//! ## Error handling
//!
//! `localStorage` can be missing (privacy modes, sandboxed iframes) or full. All
//! failures degrade to "no data": reads return `None`, writes are logged and
//! dropped. The identity provider keeps the authoritative session either way.

use crate::kv::KeyValueStore;

/// `window.localStorage`-backed KeyValueStore.
///
/// Zero-size and `Clone`: the `Storage` handle is looked up on every call,
/// which is cheap and avoids holding a JS object across page lifetimes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = self.storage() else {
            tracing::warn!(key, "localStorage unavailable, dropping write");
            return;
        };
        if storage.set_item(key, value).is_err() {
            tracing::warn!(key, "localStorage rejected write");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}
