//! # User profile as reported by the identity provider
//!
//! [`UserProfile`] is the provider's view of the signed-in account. This crate
//! only ever reads it; the one write path is [`ProfileUpdate`], sent through
//! [`crate::IdentityProvider::update_profile`] right after registration to set
//! the display name.
//!
//! The helpers here derive what the pages show:
//!
//! - [`UserProfile::display_label`]: the display name, or the part of the
//!   email before `@` when no name is set.
//! - [`UserProfile::initial`]: one uppercase character for the avatar
//!   placeholder, taken from the display name or else the email.
//! - [`UserProfile::to_cached_record`]: the four fields mirrored into local
//!   storage as a [`CachedProfileRecord`].

use serde::{Deserialize, Serialize};
use store::CachedProfileRecord;

/// Account information from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Fields that can be changed through the provider's profile update call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: None,
            avatar_url: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// Name to show, falling back to the local part of the email.
    pub fn display_label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }

    /// Uppercase initial for the avatar placeholder.
    pub fn initial(&self) -> Option<char> {
        let source = match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        };
        source.chars().next().and_then(|c| c.to_uppercase().next())
    }

    pub fn to_cached_record(&self) -> CachedProfileRecord {
        CachedProfileRecord {
            id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    /// Apply a profile update in place.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.display_name {
            self.display_name = Some(name.clone());
        }
    }
}

impl From<&UserProfile> for CachedProfileRecord {
    fn from(user: &UserProfile) -> Self {
        user.to_cached_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_fallback() {
        let user = UserProfile::new("u1", "ada.lovelace@example.com");
        assert_eq!(user.display_label(), "ada.lovelace");

        let named = user.clone().with_display_name("Ada");
        assert_eq!(named.display_label(), "Ada");

        let blank = user.with_display_name("");
        assert_eq!(blank.display_label(), "ada.lovelace");
    }

    #[test]
    fn test_initial() {
        let user = UserProfile::new("u1", "grace@example.com");
        assert_eq!(user.initial(), Some('G'));
        assert_eq!(user.with_display_name("émile").initial(), Some('É'));
    }

    #[test]
    fn test_cached_record_mirrors_fields() {
        let user = UserProfile::new("u1", "ada@example.com")
            .with_display_name("Ada")
            .with_avatar_url("https://example.com/ada.png");

        let record = CachedProfileRecord::from(&user);
        assert_eq!(record.id, "u1");
        assert_eq!(record.email, "ada@example.com");
        assert_eq!(record.display_name.as_deref(), Some("Ada"));
        assert_eq!(record.avatar_url.as_deref(), Some("https://example.com/ada.png"));
    }
}
