//! # Auth-state transition
//!
//! [`transition`] turns one auth-state emission into the ordered list of
//! [`Effect`]s the coordinator has to carry out. It is a pure function of the
//! emitted user, the current page and the [`PagePolicy`], so the whole redirect
//! and visibility policy can be checked without a browser.
//!
//! | Emission | Effects, in order |
//! |----------|-------------------|
//! | `Some(user)` | hide `AuthHidden`, show `AuthRequired`, render the user, cache the profile, then navigate home if the page is public-only |
//! | `None` | show `AuthHidden`, hide `AuthRequired`, clear the cached profile, then navigate to login if the page is protected |
//!
//! The authenticated redirect fires on **every** authenticated emission, not
//! only the first one after login.

use api::UserProfile;
use store::CachedProfileRecord;

use crate::pages::PagePolicy;

/// Element groups whose visibility follows the auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementGroup {
    /// Shown only to signed-out visitors (`.auth-hidden`).
    AuthHidden,
    /// Shown only to signed-in users (`.auth-required`).
    AuthRequired,
}

impl ElementGroup {
    pub fn selector(&self) -> &'static str {
        match self {
            ElementGroup::AuthHidden => ".auth-hidden",
            ElementGroup::AuthRequired => ".auth-required",
        }
    }
}

/// Avatar content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    Initial(char),
}

/// What the user-info elements display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub name: String,
    pub email: String,
    pub avatar: Option<Avatar>,
}

impl From<&UserProfile> for UserView {
    fn from(user: &UserProfile) -> Self {
        let avatar = match &user.avatar_url {
            Some(url) if !url.is_empty() => Some(Avatar::Image(url.clone())),
            _ => user.initial().map(Avatar::Initial),
        };
        Self {
            name: user.display_label().to_string(),
            email: user.email.clone(),
            avatar,
        }
    }
}

/// A side effect of an auth-state emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetVisible { group: ElementGroup, visible: bool },
    RenderUser(UserView),
    CacheProfile(CachedProfileRecord),
    ClearProfile,
    Navigate(String),
}

/// Effects for one emission while on `page`.
pub fn transition(user: Option<&UserProfile>, page: &str, policy: &PagePolicy) -> Vec<Effect> {
    match user {
        Some(user) => {
            let mut effects = vec![
                Effect::SetVisible {
                    group: ElementGroup::AuthHidden,
                    visible: false,
                },
                Effect::SetVisible {
                    group: ElementGroup::AuthRequired,
                    visible: true,
                },
                Effect::RenderUser(UserView::from(user)),
                Effect::CacheProfile(user.to_cached_record()),
            ];
            if let Some(target) = policy.redirect_when_authenticated(page) {
                effects.push(Effect::Navigate(target));
            }
            effects
        }
        None => {
            let mut effects = vec![
                Effect::SetVisible {
                    group: ElementGroup::AuthHidden,
                    visible: true,
                },
                Effect::SetVisible {
                    group: ElementGroup::AuthRequired,
                    visible: false,
                },
                Effect::ClearProfile,
            ];
            if let Some(target) = policy.redirect_when_unauthenticated(page) {
                effects.push(Effect::Navigate(target));
            }
            effects
        }
    }
}
