//! Auth-state coordination for the Billwise pages.
//!
//! The pure transition logic ([`effects`], [`pages`]) is separate from the
//! code that touches the page ([`UiAdapter`] implementations), so the whole
//! policy runs under `cargo test` without a browser.

pub mod adapter;
pub mod effects;
pub mod pages;

mod auth;
pub use auth::{AuthCoordinator, AuthSessionState, DEFAULT_MESSAGE_TTL};

mod error;
pub use error::AuthFlowError;

mod notify;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod dom;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use dom::DomUi;

#[cfg(test)]
mod recording;

pub use adapter::{Severity, UiAdapter};
pub use effects::{transition, Avatar, Effect, ElementGroup, UserView};
pub use pages::{page_identifier, PagePolicy};
