//! # API crate: the identity backend as seen from the pages
//!
//! This crate is the boundary between the Billwise pages and the hosted identity
//! provider. Nothing here verifies credentials or manages sessions; it defines
//! the contract the auth layer consumes and the implementations of it.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`error`] | | `ProviderError` and the fixed error-code → message table |
//! | [`models`] | | `UserProfile` and `ProfileUpdate` |
//! | [`provider`] | | The `IdentityProvider` trait and `Subscription` handle |
//! | `memory` | | `MemoryProvider`, an in-process provider for tests and offline work |
//! | `firebase` | `web` (wasm32) | `FirebaseProvider`, bindings to the Firebase compat SDK |

pub mod error;
pub mod models;
pub mod provider;

mod memory;
pub use memory::MemoryProvider;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod firebase;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use firebase::FirebaseProvider;

pub use error::{error_message, ProviderError, GENERIC_ERROR_MESSAGE};
pub use models::{ProfileUpdate, UserProfile};
pub use provider::{AuthStateCallback, FederatedProvider, IdentityProvider, Subscription};
