//! # Cached profile record
//!
//! A denormalized copy of the signed-in user, kept in local storage so that
//! pages which never talk to the identity provider (invoice lists, the invoice
//! editor) can still show who is signed in.
//!
//! ## Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`CachedProfileRecord`] | The four mirrored profile fields. Serialises to the JSON shape the invoicing pages already read: `uid`, `email`, `displayName`, `photoURL`. |
//! | [`ProfileCache`] | Writes, clears and reads the record under [`PROFILE_KEY`] in any [`KeyValueStore`]. |
//!
//! The record is advisory: it is overwritten on every authenticated emission,
//! removed on every unauthenticated one, and never consulted to decide whether
//! a session exists.

use serde::{Deserialize, Serialize};

use crate::kv::KeyValueStore;

/// Storage key of the cached profile.
pub const PROFILE_KEY: &str = "billwise_user";

/// Persisted copy of the signed-in user's profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProfileRecord {
    #[serde(rename = "uid")]
    pub id: String,
    pub email: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub avatar_url: Option<String>,
}

/// Reads and writes the [`CachedProfileRecord`] in a [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct ProfileCache<S> {
    store: S,
}

impl<S: KeyValueStore> ProfileCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrite the cached record.
    pub fn write(&self, record: &CachedProfileRecord) {
        match serde_json::to_string(record) {
            Ok(json) => self.store.set(PROFILE_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "failed to encode cached profile"),
        }
    }

    /// Remove the cached record.
    pub fn clear(&self) {
        self.store.remove(PROFILE_KEY);
    }

    /// Read the cached record. Malformed data reads as absent.
    pub fn load(&self) -> Option<CachedProfileRecord> {
        let json = self.store.get(PROFILE_KEY)?;
        match serde_json::from_str(&json) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring malformed cached profile");
                None
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
