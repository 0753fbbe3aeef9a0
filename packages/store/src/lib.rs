pub mod config;
pub mod kv;
pub mod models;

mod file_store;
pub use file_store::FileStore;

mod memory;
pub use memory::MemoryStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStore;

pub use config::{BillwiseConfig, Environment, FirebaseConfig};
pub use kv::KeyValueStore;
pub use models::{CachedProfileRecord, ProfileCache, PROFILE_KEY};
