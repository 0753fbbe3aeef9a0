//! # In-process identity provider
//!
//! [`MemoryProvider`] keeps accounts in memory and behaves like the hosted
//! backend closely enough to drive the auth layer in tests and offline
//! development:
//!
//! - subscribing emits the current state right away, like the hosted SDK does
//!   once it has restored the session;
//! - every successful register, login, popup sign-in and logout emits the new
//!   state to all listeners;
//! - validation failures use the provider's own error codes.
//!
//! Two hooks exist for exercising error and refocus paths:
//! [`fail_next`](MemoryProvider::fail_next) makes the next call fail with a given
//! code, and [`emit_current`](MemoryProvider::emit_current) re-delivers the
//! current state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::{self, ProviderError};
use crate::models::{ProfileUpdate, UserProfile};
use crate::provider::{AuthStateCallback, FederatedProvider, IdentityProvider, Subscription};

const MIN_PASSWORD_LEN: usize = 6;

type Listener = Rc<dyn Fn(Option<UserProfile>)>;

#[derive(Clone)]
struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    current: Option<UserProfile>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    next_uid: u64,
    popup_account: Option<UserProfile>,
    fail_next: Option<ProviderError>,
}

/// In-memory IdentityProvider for testing and offline development.
///
/// Clones share the same accounts and listeners.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account without signing in or emitting.
    pub fn with_account(self, email: &str, password: &str, display_name: Option<&str>) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            let mut profile = UserProfile::new(inner.allocate_uid(), email);
            profile.display_name = display_name.map(str::to_string);
            inner.accounts.insert(
                email.to_string(),
                Account {
                    profile,
                    password: password.to_string(),
                },
            );
        }
        self
    }

    /// Account returned by the popup flow. Without one, the popup behaves as
    /// if the user closed it.
    pub fn with_popup_account(self, profile: UserProfile) -> Self {
        self.inner.borrow_mut().popup_account = Some(profile);
        self
    }

    /// Make the next provider call fail with `code`.
    pub fn fail_next(&self, code: &str) {
        self.inner.borrow_mut().fail_next = Some(ProviderError::new(code));
    }

    /// Re-deliver the current state to every listener.
    pub fn emit_current(&self) {
        let current = self.inner.borrow().current.clone();
        self.emit(current);
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.borrow().current.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Look up an account's stored profile by email.
    pub fn account(&self, email: &str) -> Option<UserProfile> {
        self.inner
            .borrow()
            .accounts
            .get(email)
            .map(|a| a.profile.clone())
    }

    fn take_failure(&self) -> Result<(), ProviderError> {
        match self.inner.borrow_mut().fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn sign_in(&self, profile: UserProfile) -> UserProfile {
        self.inner.borrow_mut().current = Some(profile.clone());
        self.emit(Some(profile.clone()));
        profile
    }

    fn emit(&self, user: Option<UserProfile>) {
        // Listeners may call back into the provider, so no borrow is held
        // while they run.
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(user.clone());
        }
    }
}

impl Inner {
    fn allocate_uid(&mut self) -> String {
        self.next_uid += 1;
        format!("mem-{}", self.next_uid)
    }
}

impl IdentityProvider for MemoryProvider {
    async fn register(&self, email: &str, password: &str) -> Result<UserProfile, ProviderError> {
        self.take_failure()?;
        if !email.contains('@') {
            return Err(ProviderError::new(error::INVALID_EMAIL));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProviderError::new(error::WEAK_PASSWORD));
        }

        let profile = {
            let mut inner = self.inner.borrow_mut();
            if inner.accounts.contains_key(email) {
                return Err(ProviderError::new(error::EMAIL_ALREADY_IN_USE));
            }
            let profile = UserProfile::new(inner.allocate_uid(), email);
            inner.accounts.insert(
                email.to_string(),
                Account {
                    profile: profile.clone(),
                    password: password.to_string(),
                },
            );
            profile
        };

        Ok(self.sign_in(profile))
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ProviderError> {
        self.take_failure()?;
        if !email.contains('@') {
            return Err(ProviderError::new(error::INVALID_EMAIL));
        }

        let account = self.inner.borrow().accounts.get(email).cloned();
        let Some(account) = account else {
            return Err(ProviderError::new(error::USER_NOT_FOUND));
        };
        if account.password != password {
            return Err(ProviderError::new(error::WRONG_PASSWORD));
        }

        Ok(self.sign_in(account.profile))
    }

    async fn login_with_popup(
        &self,
        provider: FederatedProvider,
    ) -> Result<UserProfile, ProviderError> {
        self.take_failure()?;
        let account = self.inner.borrow().popup_account.clone();
        let Some(profile) = account else {
            tracing::debug!(provider = provider.label(), "no popup account configured");
            return Err(ProviderError::new(error::POPUP_CLOSED_BY_USER));
        };
        Ok(self.sign_in(profile))
    }

    async fn logout(&self) -> Result<(), ProviderError> {
        self.take_failure()?;
        self.inner.borrow_mut().current = None;
        self.emit(None);
        Ok(())
    }

    async fn update_profile(
        &self,
        user: &UserProfile,
        update: ProfileUpdate,
    ) -> Result<(), ProviderError> {
        self.take_failure()?;
        let mut inner = self.inner.borrow_mut();

        let account = inner
            .accounts
            .values_mut()
            .find(|a| a.profile.id == user.id)
            .ok_or_else(|| ProviderError::new(error::USER_NOT_FOUND))?;
        account.profile.apply(&update);

        // The hosted SDK updates its cached user without emitting.
        if let Some(current) = inner.current.as_mut().filter(|c| c.id == user.id) {
            current.apply(&update);
        }
        Ok(())
    }

    fn on_auth_state_change(&self, callback: AuthStateCallback) -> Subscription {
        let listener: Listener = Rc::from(callback);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            inner.next_listener_id += 1;
            let id = inner.next_listener_id;
            inner.listeners.push((id, Rc::clone(&listener)));
            (id, inner.current.clone())
        };

        listener(current);

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }
}
