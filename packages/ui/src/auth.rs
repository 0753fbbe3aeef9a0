//! # Authentication coordinator
//!
//! [`AuthCoordinator`] is the one place where identity-provider events and
//! user actions turn into page effects. It is built once at start-up, wrapped
//! in an `Rc` by [`AuthCoordinator::start`], and handed to whatever needs to
//! ask who is signed in.
//!
//! ## Auth-state emissions
//!
//! `start` subscribes to the provider exactly once. Each emission replaces the
//! current user and runs the effects from [`crate::effects::transition`]:
//! visibility and user info go to the [`UiAdapter`], the profile record goes
//! to the [`ProfileCache`], and redirects go to [`UiAdapter::navigate`].
//!
//! ## User actions
//!
//! | Operation | Busy label | Success message |
//! |-----------|------------|-----------------|
//! | [`handle_login`](AuthCoordinator::handle_login) | `Signing in...` | `Login successful!` |
//! | [`handle_register`](AuthCoordinator::handle_register) | `Creating account...` | `Account created successfully!` |
//! | [`sign_in_with_popup`](AuthCoordinator::sign_in_with_popup) | `Signing in with Google...` | `Google sign-in successful!` |
//! | [`sign_out`](AuthCoordinator::sign_out) | | `Signed out successfully!` |
//!
//! Failures show the message from [`api::error_message`], except sign-out which
//! always shows `Error signing out`. Busy state covers every submit button on
//! the page and is released by a drop guard, so buttons come back on every
//! path. Overlapping operations share one busy period: the first one disables
//! the buttons and the last one to finish restores them.
//!
//! Navigation after a successful sign-in is not done here; it happens when the
//! provider emits the new state, which may arrive before or after the success
//! message.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use api::{FederatedProvider, IdentityProvider, ProfileUpdate, Subscription, UserProfile};
use store::{KeyValueStore, ProfileCache};

use crate::adapter::{Severity, UiAdapter};
use crate::effects::{transition, Effect};
use crate::error::AuthFlowError;
use crate::notify::Notifier;
use crate::pages::{page_identifier, PagePolicy};

const SIGNING_IN: &str = "Signing in...";
const CREATING_ACCOUNT: &str = "Creating account...";
const SIGNING_IN_WITH_GOOGLE: &str = "Signing in with Google...";

const LOGIN_SUCCESS: &str = "Login successful!";
const REGISTER_SUCCESS: &str = "Account created successfully!";
const POPUP_SUCCESS: &str = "Google sign-in successful!";
const SIGN_OUT_SUCCESS: &str = "Signed out successfully!";
const SIGN_OUT_FAILURE: &str = "Error signing out";

/// Default lifetime of a status message.
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Who is signed in, as last reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthSessionState {
    Authenticated(UserProfile),
    #[default]
    Unauthenticated,
}

impl AuthSessionState {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthSessionState::Authenticated(user) => Some(user),
            AuthSessionState::Unauthenticated => None,
        }
    }
}

impl From<Option<UserProfile>> for AuthSessionState {
    fn from(user: Option<UserProfile>) -> Self {
        match user {
            Some(user) => AuthSessionState::Authenticated(user),
            None => AuthSessionState::Unauthenticated,
        }
    }
}

/// Translates provider events and user actions into page effects.
pub struct AuthCoordinator<P, S, U> {
    provider: P,
    cache: ProfileCache<S>,
    ui: Rc<U>,
    policy: PagePolicy,
    page: String,
    state: RefCell<AuthSessionState>,
    notifier: Notifier<U>,
    busy_depth: Cell<usize>,
    subscription: RefCell<Option<Subscription>>,
}

impl<P, S, U> AuthCoordinator<P, S, U>
where
    P: IdentityProvider + 'static,
    S: KeyValueStore + 'static,
    U: UiAdapter + 'static,
{
    /// Create a coordinator for the page at `pathname`.
    pub fn new(provider: P, store: S, ui: U, policy: PagePolicy, pathname: &str) -> Self {
        let ui = Rc::new(ui);
        Self {
            provider,
            cache: ProfileCache::new(store),
            notifier: Notifier::new(Rc::clone(&ui), DEFAULT_MESSAGE_TTL),
            ui,
            policy,
            page: page_identifier(pathname).to_string(),
            state: RefCell::new(AuthSessionState::Unauthenticated),
            busy_depth: Cell::new(0),
            subscription: RefCell::new(None),
        }
    }

    /// How long status messages stay visible.
    pub fn with_message_ttl(mut self, ttl: Duration) -> Self {
        self.notifier = Notifier::new(Rc::clone(&self.ui), ttl);
        self
    }

    /// Subscribe to the provider's auth-state stream and share the coordinator.
    pub fn start(self) -> Rc<Self> {
        let this = Rc::new(self);
        let weak = Rc::downgrade(&this);
        let subscription = this
            .provider
            .on_auth_state_change(Box::new(move |user: Option<UserProfile>| {
                if let Some(this) = weak.upgrade() {
                    this.on_auth_state_change(user);
                }
            }));
        *this.subscription.borrow_mut() = Some(subscription);
        tracing::debug!(page = %this.page, "auth coordinator started");
        this
    }

    fn on_auth_state_change(&self, user: Option<UserProfile>) {
        let effects = transition(user.as_ref(), &self.page, &self.policy);
        match &user {
            Some(user) => tracing::info!(uid = %user.id, "auth state: signed in"),
            None => tracing::info!("auth state: signed out"),
        }
        *self.state.borrow_mut() = AuthSessionState::from(user);

        for effect in effects {
            self.dispatch(effect);
        }
    }

    fn dispatch(&self, effect: Effect) {
        tracing::debug!(?effect, "dispatching effect");
        match effect {
            Effect::SetVisible { group, visible } => self.ui.set_visible(group, visible),
            Effect::RenderUser(view) => self.ui.render_user(&view),
            Effect::CacheProfile(record) => self.cache.write(&record),
            Effect::ClearProfile => self.cache.clear(),
            Effect::Navigate(target) => self.ui.navigate(&target),
        }
    }

    /// Sign in with email and password.
    pub async fn handle_login(&self, email: &str, password: &str) -> Result<(), AuthFlowError> {
        let _busy = self.busy(SIGNING_IN);
        match self.provider.login(email, password).await {
            Ok(user) => {
                tracing::info!(uid = %user.id, "signed in with password");
                self.show_message(LOGIN_SUCCESS, Severity::Success);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(code = %err.code, "sign-in failed");
                self.show_message(err.user_message(), Severity::Error);
                Err(AuthFlowError::Login(err))
            }
        }
    }

    /// Create an account, then set its display name when one was given.
    pub async fn handle_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthFlowError> {
        let _busy = self.busy(CREATING_ACCOUNT);
        match self.register_account(name, email, password).await {
            Ok(user) => {
                tracing::info!(uid = %user.id, "account created");
                self.show_message(REGISTER_SUCCESS, Severity::Success);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "registration failed");
                self.show_message(err.provider_error().user_message(), Severity::Error);
                Err(err)
            }
        }
    }

    async fn register_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthFlowError> {
        let user = self
            .provider
            .register(email, password)
            .await
            .map_err(AuthFlowError::Register)?;

        let name = name.trim();
        if !name.is_empty() {
            let update = ProfileUpdate {
                display_name: Some(name.to_string()),
            };
            self.provider
                .update_profile(&user, update)
                .await
                .map_err(AuthFlowError::ProfileUpdate)?;
        }
        Ok(user)
    }

    /// Sign in through the Google popup.
    pub async fn sign_in_with_popup(&self) -> Result<(), AuthFlowError> {
        let _busy = self.busy(SIGNING_IN_WITH_GOOGLE);
        match self.provider.login_with_popup(FederatedProvider::Google).await {
            Ok(user) => {
                tracing::info!(uid = %user.id, "signed in with popup");
                self.show_message(POPUP_SUCCESS, Severity::Success);
                Ok(())
            }
            Err(err) if err.is_cancellation() => {
                tracing::debug!("popup closed by user");
                self.show_message(err.user_message(), Severity::Info);
                Err(AuthFlowError::Popup(err))
            }
            Err(err) => {
                tracing::warn!(code = %err.code, "popup sign-in failed");
                self.show_message(err.user_message(), Severity::Error);
                Err(AuthFlowError::Popup(err))
            }
        }
    }

    /// Sign out. Failures show a fixed message whatever the provider code.
    pub async fn sign_out(&self) -> Result<(), AuthFlowError> {
        match self.provider.logout().await {
            Ok(()) => {
                self.show_message(SIGN_OUT_SUCCESS, Severity::Success);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(code = %err.code, "sign-out failed");
                self.show_message(SIGN_OUT_FAILURE, Severity::Error);
                Err(AuthFlowError::SignOut(err))
            }
        }
    }

    /// Show a transient status message, replacing any current one.
    pub fn show_message(&self, text: &str, severity: Severity) {
        self.notifier.show(text, severity);
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user().is_some()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.borrow().user().map(|u| u.id.clone())
    }

    /// Page identifier this coordinator was created for.
    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn profile_cache(&self) -> &ProfileCache<S> {
        &self.cache
    }

    fn busy(&self, label: &str) -> BusyGuard<'_, U> {
        BusyGuard::engage(self.ui.as_ref(), &self.busy_depth, label)
    }
}

/// Holds the submit buttons busy until dropped.
struct BusyGuard<'a, U: UiAdapter> {
    ui: &'a U,
    depth: &'a Cell<usize>,
}

impl<'a, U: UiAdapter> BusyGuard<'a, U> {
    fn engage(ui: &'a U, depth: &'a Cell<usize>, label: &str) -> Self {
        if depth.get() == 0 {
            ui.set_submit_busy(label);
        }
        depth.set(depth.get() + 1);
        Self { ui, depth }
    }
}

impl<U: UiAdapter> Drop for BusyGuard<'_, U> {
    fn drop(&mut self) {
        let remaining = self.depth.get().saturating_sub(1);
        self.depth.set(remaining);
        if remaining == 0 {
            self.ui.restore_submit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::{pin, Pin};
    use std::task::{Context, Poll, Waker};

    use crate::effects::{Avatar, ElementGroup};
    use crate::recording::RecordingUi;
    use api::{error, MemoryProvider, GENERIC_ERROR_MESSAGE};
    use store::config::PagesConfig;
    use store::{CachedProfileRecord, MemoryStore, PROFILE_KEY};

    type TestCoordinator = AuthCoordinator<MemoryProvider, MemoryStore, RecordingUi>;

    fn coordinator(
        provider: &MemoryProvider,
        store: &MemoryStore,
        pathname: &str,
    ) -> Rc<TestCoordinator> {
        let ui = RecordingUi::with_submit_buttons(&["Sign in", "Create account"]);
        let policy = PagePolicy::from_config(&PagesConfig::default(), "/invoicing-project");
        AuthCoordinator::new(provider.clone(), store.clone(), ui, policy, pathname).start()
    }

    fn ada_provider() -> MemoryProvider {
        MemoryProvider::new().with_account("ada@example.com", "secret1", Some("Ada"))
    }

    fn cached(store: &MemoryStore) -> Option<CachedProfileRecord> {
        ProfileCache::new(store.clone()).load()
    }

    #[tokio::test]
    async fn test_unauthenticated_before_and_after_emissions() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoicing-project/invoices.html");

        assert!(!coordinator.is_authenticated());
        assert!(coordinator.current_user().is_none());
        assert!(coordinator.user_id().is_none());

        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();
        assert!(coordinator.is_authenticated());
        assert!(coordinator.user_id().is_some());

        coordinator.sign_out().await.unwrap();
        assert!(!coordinator.is_authenticated());
        assert!(coordinator.current_user().is_none());
    }

    #[tokio::test]
    async fn test_authenticated_emission_caches_profile_and_renders() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        // Neither public-only nor protected
        let coordinator = coordinator(&provider, &store, "/invoicing-project/about.html");
        assert!(coordinator.ui().state().navigations.is_empty());

        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();

        let user = coordinator.current_user().unwrap();
        assert_eq!(cached(&store), Some(user.to_cached_record()));

        let state = coordinator.ui().state();
        assert_eq!(state.visibility.get(&ElementGroup::AuthHidden), Some(&false));
        assert_eq!(state.visibility.get(&ElementGroup::AuthRequired), Some(&true));
        let view = state.user_view.unwrap();
        assert_eq!(view.name, "Ada");
        assert_eq!(view.email, "ada@example.com");
        assert_eq!(view.avatar, Some(Avatar::Initial('A')));

        // Not a public-only page: the authenticated emission does not navigate
        assert!(state.navigations.is_empty());
    }

    #[tokio::test]
    async fn test_cache_is_overwritten_not_merged() {
        let provider = MemoryProvider::new()
            .with_account("ada@example.com", "secret1", Some("Ada"))
            .with_account("bob@example.com", "secret2", None);
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoices.html");

        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();
        coordinator.handle_login("bob@example.com", "secret2").await.unwrap();

        let record = cached(&store).unwrap();
        assert_eq!(record.email, "bob@example.com");
        assert!(record.display_name.is_none());
    }

    #[tokio::test]
    async fn test_unauthenticated_emission_removes_cache() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoices.html");

        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();
        assert!(store.get(PROFILE_KEY).is_some());

        coordinator.sign_out().await.unwrap();
        assert!(store.get(PROFILE_KEY).is_none());

        let state = coordinator.ui().state();
        assert_eq!(state.visibility.get(&ElementGroup::AuthHidden), Some(&true));
        assert_eq!(state.visibility.get(&ElementGroup::AuthRequired), Some(&false));
    }

    #[tokio::test]
    async fn test_login_page_redirects_to_dashboard_on_every_emission() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoicing-project/login.html");

        // Initial unauthenticated emission on a public page: no navigation
        assert!(coordinator.ui().state().navigations.is_empty());

        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();
        provider.emit_current();

        assert_eq!(
            coordinator.ui().state().navigations,
            vec![
                "/invoicing-project/dashboard.html".to_string(),
                "/invoicing-project/dashboard.html".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_protected_page_redirects_to_login_when_signed_out() {
        let provider = MemoryProvider::new();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoicing-project/dashboard.html");

        // The initial emission already reports no session
        assert_eq!(
            coordinator.ui().state().navigations,
            vec!["/invoicing-project/login.html".to_string()]
        );
    }

    #[tokio::test]
    async fn test_login_failure_shows_mapped_message_and_restores_buttons() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/login.html");

        let err = coordinator
            .handle_login("ada@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err, AuthFlowError::Login(api::ProviderError::new(error::WRONG_PASSWORD)));

        let ui = coordinator.ui();
        assert_eq!(
            ui.state().notification,
            Some(("Incorrect password.".to_string(), Severity::Error))
        );
        assert!(!ui.any_button_disabled());
        assert_eq!(ui.button_labels(), vec!["Sign in", "Create account"]);
        assert_eq!(ui.state().busy_calls, 1);
        assert!(!coordinator.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_success_message() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoices.html");

        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();

        let ui = coordinator.ui();
        assert_eq!(
            ui.state().notification,
            Some(("Login successful!".to_string(), Severity::Success))
        );
        assert!(!ui.any_button_disabled());
        assert_eq!(ui.button_labels(), vec!["Sign in", "Create account"]);
    }

    #[tokio::test]
    async fn test_unknown_error_code_uses_generic_message() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/login.html");

        provider.fail_next("auth/network-request-failed");
        coordinator.handle_login("ada@example.com", "secret1").await.unwrap_err();

        assert_eq!(
            coordinator.ui().state().notification,
            Some((GENERIC_ERROR_MESSAGE.to_string(), Severity::Error))
        );
    }

    #[tokio::test]
    async fn test_register_sets_display_name() {
        let provider = MemoryProvider::new();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoices.html");

        coordinator
            .handle_register("  Grace Hopper ", "grace@example.com", "secret1")
            .await
            .unwrap();

        let account = provider.account("grace@example.com").unwrap();
        assert_eq!(account.display_name.as_deref(), Some("Grace Hopper"));
        assert_eq!(
            coordinator.ui().state().notification,
            Some(("Account created successfully!".to_string(), Severity::Success))
        );
        assert_eq!(coordinator.ui().button_labels(), vec!["Sign in", "Create account"]);
    }

    #[tokio::test]
    async fn test_register_without_name_skips_profile_update() {
        let provider = MemoryProvider::new();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoices.html");

        coordinator
            .handle_register("   ", "grace@example.com", "secret1")
            .await
            .unwrap();

        assert!(provider.account("grace@example.com").unwrap().display_name.is_none());
    }

    #[tokio::test]
    async fn test_register_failure_kinds_are_distinguished() {
        let provider = MemoryProvider::new().with_account("taken@example.com", "secret1", None);
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/login.html");

        let err = coordinator
            .handle_register("Taken", "taken@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFlowError::Register(_)));
        assert_eq!(
            coordinator.ui().state().notification,
            Some(("Email already registered.".to_string(), Severity::Error))
        );

        // Account creation succeeds, display-name update fails
        let provider = MemoryProvider::new();
        let coordinator = coordinator_with_failing_update(&provider, &store);
        let err = coordinator
            .handle_register("Ada", "ada@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthFlowError::ProfileUpdate(_)));
        assert_eq!(
            coordinator.ui().state().notification,
            Some((GENERIC_ERROR_MESSAGE.to_string(), Severity::Error))
        );
        assert!(!coordinator.ui().any_button_disabled());
    }

    /// Provider whose `update_profile` always fails.
    #[derive(Clone)]
    struct FailingUpdate(MemoryProvider);

    impl IdentityProvider for FailingUpdate {
        async fn register(
            &self,
            email: &str,
            password: &str,
        ) -> Result<UserProfile, api::ProviderError> {
            self.0.register(email, password).await
        }

        async fn login(
            &self,
            email: &str,
            password: &str,
        ) -> Result<UserProfile, api::ProviderError> {
            self.0.login(email, password).await
        }

        async fn login_with_popup(
            &self,
            provider: FederatedProvider,
        ) -> Result<UserProfile, api::ProviderError> {
            self.0.login_with_popup(provider).await
        }

        async fn logout(&self) -> Result<(), api::ProviderError> {
            self.0.logout().await
        }

        async fn update_profile(
            &self,
            _user: &UserProfile,
            _update: ProfileUpdate,
        ) -> Result<(), api::ProviderError> {
            Err(api::ProviderError::new("auth/requires-recent-login"))
        }

        fn on_auth_state_change(&self, callback: api::AuthStateCallback) -> Subscription {
            self.0.on_auth_state_change(callback)
        }
    }

    fn coordinator_with_failing_update(
        provider: &MemoryProvider,
        store: &MemoryStore,
    ) -> Rc<AuthCoordinator<FailingUpdate, MemoryStore, RecordingUi>> {
        let ui = RecordingUi::with_submit_buttons(&["Create account"]);
        AuthCoordinator::new(
            FailingUpdate(provider.clone()),
            store.clone(),
            ui,
            PagePolicy::default(),
            "/login.html",
        )
        .start()
    }

    /// Future that is pending on its first poll.
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    /// Provider that suspends once before every call it forwards.
    struct Pausing(MemoryProvider);

    impl IdentityProvider for Pausing {
        async fn register(
            &self,
            email: &str,
            password: &str,
        ) -> Result<UserProfile, api::ProviderError> {
            YieldOnce(false).await;
            self.0.register(email, password).await
        }

        async fn login(
            &self,
            email: &str,
            password: &str,
        ) -> Result<UserProfile, api::ProviderError> {
            YieldOnce(false).await;
            self.0.login(email, password).await
        }

        async fn login_with_popup(
            &self,
            provider: FederatedProvider,
        ) -> Result<UserProfile, api::ProviderError> {
            YieldOnce(false).await;
            self.0.login_with_popup(provider).await
        }

        async fn logout(&self) -> Result<(), api::ProviderError> {
            YieldOnce(false).await;
            self.0.logout().await
        }

        async fn update_profile(
            &self,
            user: &UserProfile,
            update: ProfileUpdate,
        ) -> Result<(), api::ProviderError> {
            YieldOnce(false).await;
            self.0.update_profile(user, update).await
        }

        fn on_auth_state_change(&self, callback: api::AuthStateCallback) -> Subscription {
            self.0.on_auth_state_change(callback)
        }
    }

    /// Poll `fut` to completion, returning its output and the button labels
    /// seen each time it was suspended.
    fn run_suspended<F: Future>(fut: F, ui: &RecordingUi) -> (F::Output, Vec<Vec<String>>) {
        let mut fut = pin!(fut);
        let mut cx = Context::from_waker(Waker::noop());
        let mut suspended = Vec::new();
        loop {
            match fut.as_mut().poll(&mut cx) {
                Poll::Ready(output) => return (output, suspended),
                Poll::Pending => {
                    if ui.any_button_disabled() {
                        suspended.push(ui.button_labels());
                    } else {
                        suspended.push(Vec::new());
                    }
                }
            }
        }
    }

    #[test]
    fn test_busy_labels_while_operations_run() {
        let provider = MemoryProvider::new()
            .with_account("ada@example.com", "secret1", Some("Ada"))
            .with_popup_account(UserProfile::new("g-1", "g@example.com"));
        let ui = RecordingUi::with_submit_buttons(&["Sign in", "Create account"]);
        let coordinator = AuthCoordinator::new(
            Pausing(provider),
            MemoryStore::new(),
            ui,
            PagePolicy::default(),
            "/about.html",
        )
        .start();
        let ui = coordinator.ui();
        let busy = |label: &str| vec![label.to_string(), label.to_string()];

        let (result, seen) =
            run_suspended(coordinator.handle_login("ada@example.com", "secret1"), ui);
        assert!(result.is_ok());
        assert_eq!(seen, vec![busy(SIGNING_IN)]);
        assert!(!ui.any_button_disabled());

        // Registration suspends in account creation and in the profile update
        let (result, seen) = run_suspended(
            coordinator.handle_register("Grace", "grace@example.com", "secret1"),
            ui,
        );
        assert!(result.is_ok());
        assert_eq!(seen, vec![busy(CREATING_ACCOUNT), busy(CREATING_ACCOUNT)]);
        assert!(!ui.any_button_disabled());

        let (result, seen) = run_suspended(coordinator.sign_in_with_popup(), ui);
        assert!(result.is_ok());
        assert_eq!(seen, vec![busy(SIGNING_IN_WITH_GOOGLE)]);
        assert_eq!(ui.button_labels(), vec!["Sign in", "Create account"]);

        // Sign-out never marks the buttons busy
        let (result, seen) = run_suspended(coordinator.sign_out(), ui);
        assert!(result.is_ok());
        assert_eq!(seen, vec![Vec::<String>::new()]);
    }

    #[tokio::test]
    async fn test_popup_failure_shows_mapped_error() {
        let provider = MemoryProvider::new()
            .with_popup_account(UserProfile::new("g-1", "g@example.com"));
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/login.html");

        provider.fail_next(error::TOO_MANY_REQUESTS);
        let err = coordinator.sign_in_with_popup().await.unwrap_err();

        assert!(matches!(err, AuthFlowError::Popup(_)));
        assert!(!err.provider_error().is_cancellation());
        assert_eq!(
            coordinator.ui().state().notification,
            Some(("Too many attempts. Try again later.".to_string(), Severity::Error))
        );
        assert!(!coordinator.ui().any_button_disabled());
        assert!(!coordinator.is_authenticated());
    }

    #[tokio::test]
    async fn test_popup_cancelled_is_informational() {
        let provider = MemoryProvider::new();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/login.html");

        let err = coordinator.sign_in_with_popup().await.unwrap_err();
        assert!(err.provider_error().is_cancellation());
        assert_eq!(
            coordinator.ui().state().notification,
            Some(("Sign-in cancelled.".to_string(), Severity::Info))
        );
        assert!(!coordinator.ui().any_button_disabled());
    }

    #[tokio::test]
    async fn test_popup_success_redirects_from_login() {
        let provider = MemoryProvider::new().with_popup_account(
            UserProfile::new("g-1", "g@example.com").with_avatar_url("https://example.com/g.png"),
        );
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoicing-project/login.html");

        coordinator.sign_in_with_popup().await.unwrap();

        let state = coordinator.ui().state();
        assert_eq!(
            state.notification,
            Some(("Google sign-in successful!".to_string(), Severity::Success))
        );
        assert_eq!(
            state.navigations,
            vec!["/invoicing-project/dashboard.html".to_string()]
        );
        assert_eq!(
            state.user_view.unwrap().avatar,
            Some(Avatar::Image("https://example.com/g.png".to_string()))
        );
        assert_eq!(coordinator.user_id().as_deref(), Some("g-1"));
    }

    #[tokio::test]
    async fn test_sign_out_failure_uses_fixed_message() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoices.html");
        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();

        provider.fail_next(error::TOO_MANY_REQUESTS);
        let err = coordinator.sign_out().await.unwrap_err();

        assert!(matches!(err, AuthFlowError::SignOut(_)));
        assert_eq!(
            coordinator.ui().state().notification,
            Some(("Error signing out".to_string(), Severity::Error))
        );
        // Still signed in, buttons never touched
        assert!(coordinator.is_authenticated());
        assert_eq!(coordinator.ui().state().busy_calls, 1);
    }

    #[tokio::test]
    async fn test_sign_out_success_message() {
        let provider = ada_provider();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/invoices.html");

        // invoices.html is protected: the initial signed-out emission redirects
        assert_eq!(
            coordinator.ui().state().navigations,
            vec!["/invoicing-project/login.html".to_string()]
        );

        coordinator.handle_login("ada@example.com", "secret1").await.unwrap();
        let before = coordinator.ui().state().navigations.len();
        assert_eq!(before, 1);
        coordinator.sign_out().await.unwrap();

        let state = coordinator.ui().state();
        assert_eq!(
            state.notification,
            Some(("Signed out successfully!".to_string(), Severity::Success))
        );
        assert_eq!(
            state.navigations[before..].to_vec(),
            vec!["/invoicing-project/login.html".to_string()]
        );
    }

    #[test]
    fn test_nested_busy_guards_restore_labels_once() {
        let ui = RecordingUi::with_submit_buttons(&["Sign in", "Create account"]);
        let depth = Cell::new(0);

        let outer = BusyGuard::engage(&ui, &depth, SIGNING_IN);
        let inner = BusyGuard::engage(&ui, &depth, SIGNING_IN_WITH_GOOGLE);
        assert_eq!(ui.button_labels(), vec![SIGNING_IN, SIGNING_IN]);
        assert_eq!(ui.state().busy_calls, 1);

        drop(outer);
        assert!(ui.any_button_disabled());

        drop(inner);
        assert!(!ui.any_button_disabled());
        assert_eq!(ui.button_labels(), vec!["Sign in", "Create account"]);
        assert_eq!(depth.get(), 0);
    }

    #[tokio::test]
    async fn test_message_auto_dismiss() {
        let provider = MemoryProvider::new();
        let store = MemoryStore::new();
        let ui = RecordingUi::new();
        let coordinator = AuthCoordinator::new(provider, store, ui, PagePolicy::default(), "/")
            .with_message_ttl(Duration::from_millis(1500))
            .start();

        coordinator.show_message("Saved", Severity::Info);
        let timer = coordinator.ui().take_next_timer().unwrap();
        assert_eq!(timer.0, Duration::from_millis(1500));

        (timer.1)();
        assert!(!coordinator.ui().state().notification_visible);
    }

    #[tokio::test]
    async fn test_dropping_coordinator_unsubscribes() {
        let provider = MemoryProvider::new();
        let store = MemoryStore::new();
        let coordinator = coordinator(&provider, &store, "/login.html");
        assert_eq!(provider.listener_count(), 1);

        drop(coordinator);
        assert_eq!(provider.listener_count(), 0);
    }
}
