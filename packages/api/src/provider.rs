//! # Identity provider contract
//!
//! [`IdentityProvider`] is everything the auth layer consumes from the hosted
//! identity backend. Credential checks, sessions, tokens and the OAuth popup all
//! happen on the other side of this trait.
//!
//! | Method | Resolves to |
//! |--------|-------------|
//! | [`register`](IdentityProvider::register) | the new account's [`UserProfile`] |
//! | [`login`](IdentityProvider::login) | the signed-in [`UserProfile`] |
//! | [`login_with_popup`](IdentityProvider::login_with_popup) | the signed-in [`UserProfile`] after the federated flow |
//! | [`logout`](IdentityProvider::logout) | `()` |
//! | [`update_profile`](IdentityProvider::update_profile) | `()` |
//! | [`on_auth_state_change`](IdentityProvider::on_auth_state_change) | a [`Subscription`] that stays active until dropped |
//!
//! The async methods return plain `impl Future` without a `Send` bound: the
//! browser runs everything on one thread and the Firebase handles are `!Send`.
//!
//! Auth-state callbacks receive `Some(profile)` whenever a session becomes
//! present and `None` when it goes away, in the order the provider produces
//! them.

use std::future::Future;

use crate::error::ProviderError;
use crate::models::{ProfileUpdate, UserProfile};

/// Callback invoked on every auth-state emission.
pub type AuthStateCallback = Box<dyn Fn(Option<UserProfile>)>;

/// Federated identity providers available through the popup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
}

impl FederatedProvider {
    pub fn label(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "Google",
        }
    }
}

/// Async interface to the hosted identity backend.
pub trait IdentityProvider {
    fn register(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserProfile, ProviderError>>;

    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserProfile, ProviderError>>;

    fn login_with_popup(
        &self,
        provider: FederatedProvider,
    ) -> impl Future<Output = Result<UserProfile, ProviderError>>;

    fn logout(&self) -> impl Future<Output = Result<(), ProviderError>>;

    fn update_profile(
        &self,
        user: &UserProfile,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<(), ProviderError>>;

    /// Register `callback` for auth-state emissions.
    fn on_auth_state_change(&self, callback: AuthStateCallback) -> Subscription;
}

/// Handle to an auth-state listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Stop receiving emissions.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
