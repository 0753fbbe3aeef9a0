//! # Key-value persistence
//!
//! [`KeyValueStore`] is the small synchronous interface the auth layer uses for
//! anything that has to survive a page load. It mirrors the browser's
//! `localStorage`: string keys, string values, and no error reporting on the
//! write path. Implementations log failures and carry on, because the data kept
//! here is advisory and the identity provider remains the source of truth.
//!
//! Implementations live in sibling modules ([`crate::memory`],
//! [`crate::file_store`], and the browser-only `local` module).

/// Synchronous string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing whatever was there.
    fn set(&self, key: &str, value: &str);

    /// Remove `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
