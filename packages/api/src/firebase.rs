//! # Firebase Authentication bindings (browser only)
//!
//! [`FirebaseProvider`] implements [`IdentityProvider`] on top of the Firebase
//! **compat** SDK, which the pages load as plain scripts:
//!
//! ```html
//! <script src="https://www.gstatic.com/firebasejs/10.7.1/firebase-app-compat.js"></script>
//! <script src="https://www.gstatic.com/firebasejs/10.7.1/firebase-auth-compat.js"></script>
//! ```
//!
//! The compat build exposes a `firebase` global, so the bindings below are plain
//! `js_namespace = firebase` imports and no JS shim module is needed.
//!
//! ## Mapping
//!
//! | Trait method | Firebase call |
//! |--------------|---------------|
//! | `register` | `auth.createUserWithEmailAndPassword(email, password)` |
//! | `login` | `auth.signInWithEmailAndPassword(email, password)` |
//! | `login_with_popup` | `auth.signInWithPopup(new firebase.auth.GoogleAuthProvider())` |
//! | `logout` | `auth.signOut()` |
//! | `update_profile` | `auth.currentUser.updateProfile({ displayName })` |
//! | `on_auth_state_change` | `auth.onAuthStateChanged(observer)`; the returned function unsubscribes |
//!
//! Rejected promises carry `{ code, message }`; both are copied into a
//! [`ProviderError`]. Values without a `code` map to `auth/internal-error`.

use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use store::FirebaseConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::ProviderError;
use crate::models::{ProfileUpdate, UserProfile};
use crate::provider::{AuthStateCallback, FederatedProvider, IdentityProvider, Subscription};

const INTERNAL_ERROR: &str = "auth/internal-error";
const NO_CURRENT_USER: &str = "auth/no-current-user";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = firebase, js_name = initializeApp)]
    fn initialize_app(options: &JsValue) -> Result<JsValue, JsValue>;

    #[derive(Debug, Clone)]
    type Auth;

    #[wasm_bindgen(catch, js_namespace = firebase, js_name = auth)]
    fn firebase_auth() -> Result<Auth, JsValue>;

    #[wasm_bindgen(method, catch, js_name = createUserWithEmailAndPassword)]
    fn create_user_with_email_and_password(
        this: &Auth,
        email: &str,
        password: &str,
    ) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = signInWithEmailAndPassword)]
    fn sign_in_with_email_and_password(
        this: &Auth,
        email: &str,
        password: &str,
    ) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = signInWithPopup)]
    fn sign_in_with_popup(this: &Auth, provider: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = signOut)]
    fn sign_out(this: &Auth) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, getter, js_name = currentUser)]
    fn current_user(this: &Auth) -> JsValue;

    #[wasm_bindgen(method, js_name = onAuthStateChanged)]
    fn on_auth_state_changed(this: &Auth, observer: &Function) -> Function;

    #[wasm_bindgen(js_namespace = ["firebase", "auth"])]
    type GoogleAuthProvider;

    #[wasm_bindgen(constructor, catch, js_namespace = ["firebase", "auth"])]
    fn new() -> Result<GoogleAuthProvider, JsValue>;
}

/// IdentityProvider backed by the Firebase compat SDK.
#[derive(Debug, Clone)]
pub struct FirebaseProvider {
    auth: Auth,
}

impl FirebaseProvider {
    /// Initialise the Firebase app with `config` and grab its auth instance.
    pub fn initialize(config: &FirebaseConfig) -> Result<Self, ProviderError> {
        let options = config
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ProviderError::with_message(INTERNAL_ERROR, e.to_string()))?;
        initialize_app(&options).map_err(|e| provider_error(&e))?;
        let auth = firebase_auth().map_err(|e| provider_error(&e))?;
        tracing::info!(project = %config.project_id, "firebase initialised");
        Ok(Self { auth })
    }

    fn popup_provider(provider: FederatedProvider) -> Result<JsValue, ProviderError> {
        match provider {
            FederatedProvider::Google => GoogleAuthProvider::new()
                .map(JsValue::from)
                .map_err(|e| provider_error(&e)),
        }
    }
}

impl IdentityProvider for FirebaseProvider {
    async fn register(&self, email: &str, password: &str) -> Result<UserProfile, ProviderError> {
        let promise = self
            .auth
            .create_user_with_email_and_password(email, password)
            .map_err(|e| provider_error(&e))?;
        credential_user(promise).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ProviderError> {
        let promise = self
            .auth
            .sign_in_with_email_and_password(email, password)
            .map_err(|e| provider_error(&e))?;
        credential_user(promise).await
    }

    async fn login_with_popup(
        &self,
        provider: FederatedProvider,
    ) -> Result<UserProfile, ProviderError> {
        let handle = Self::popup_provider(provider)?;
        let promise = self
            .auth
            .sign_in_with_popup(&handle)
            .map_err(|e| provider_error(&e))?;
        credential_user(promise).await
    }

    async fn logout(&self) -> Result<(), ProviderError> {
        let promise = self.auth.sign_out().map_err(|e| provider_error(&e))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| provider_error(&e))
    }

    async fn update_profile(
        &self,
        user: &UserProfile,
        update: ProfileUpdate,
    ) -> Result<(), ProviderError> {
        let current = self.auth.current_user();
        let same_user = string_field(&current, "uid").is_some_and(|uid| uid == user.id);
        if !same_user {
            return Err(ProviderError::new(NO_CURRENT_USER));
        }

        let fields = Object::new();
        if let Some(name) = &update.display_name {
            Reflect::set(&fields, &"displayName".into(), &JsValue::from_str(name))
                .map_err(|e| provider_error(&e))?;
        }

        let method: Function = Reflect::get(&current, &"updateProfile".into())
            .map_err(|e| provider_error(&e))?
            .dyn_into()
            .map_err(|e| provider_error(&e))?;
        let promise: Promise = method
            .call1(&current, &fields)
            .map_err(|e| provider_error(&e))?
            .dyn_into()
            .map_err(|e| provider_error(&e))?;

        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| provider_error(&e))
    }

    fn on_auth_state_change(&self, callback: AuthStateCallback) -> Subscription {
        let observer = Closure::<dyn FnMut(JsValue)>::new(move |user: JsValue| {
            callback(profile_from_js(&user));
        });
        let unsubscribe = self
            .auth
            .on_auth_state_changed(observer.as_ref().unchecked_ref());

        Subscription::new(move || {
            let _ = unsubscribe.call0(&JsValue::NULL);
            drop(observer);
        })
    }
}

/// Await a `UserCredential` promise and extract its user.
async fn credential_user(promise: Promise) -> Result<UserProfile, ProviderError> {
    let credential = JsFuture::from(promise)
        .await
        .map_err(|e| provider_error(&e))?;
    let user = Reflect::get(&credential, &"user".into()).map_err(|e| provider_error(&e))?;
    profile_from_js(&user).ok_or_else(|| ProviderError::new(INTERNAL_ERROR))
}

/// Convert a Firebase `User` object. `null`/`undefined` means signed out.
fn profile_from_js(user: &JsValue) -> Option<UserProfile> {
    if user.is_null() || user.is_undefined() {
        return None;
    }
    let id = string_field(user, "uid")?;
    Some(UserProfile {
        id,
        email: string_field(user, "email").unwrap_or_default(),
        display_name: string_field(user, "displayName"),
        avatar_url: string_field(user, "photoURL"),
    })
}

fn string_field(value: &JsValue, name: &str) -> Option<String> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    Reflect::get(value, &JsValue::from_str(name))
        .ok()?
        .as_string()
}

fn provider_error(value: &JsValue) -> ProviderError {
    let code = string_field(value, "code").unwrap_or_else(|| INTERNAL_ERROR.to_string());
    let message = string_field(value, "message")
        .or_else(|| value.as_string())
        .unwrap_or_else(|| code.clone());
    ProviderError::with_message(code, message)
}
