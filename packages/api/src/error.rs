//! # Provider errors and their user-facing messages
//!
//! Every failure the identity provider reports is a [`ProviderError`] carrying
//! an opaque code from the provider's vocabulary (`"auth/wrong-password"`, ...)
//! and, when available, the provider's own diagnostic text. The diagnostic text
//! is for logs only; users see the fixed strings from [`error_message`].

use thiserror::Error;

pub const USER_NOT_FOUND: &str = "auth/user-not-found";
pub const WRONG_PASSWORD: &str = "auth/wrong-password";
pub const EMAIL_ALREADY_IN_USE: &str = "auth/email-already-in-use";
pub const WEAK_PASSWORD: &str = "auth/weak-password";
pub const INVALID_EMAIL: &str = "auth/invalid-email";
pub const TOO_MANY_REQUESTS: &str = "auth/too-many-requests";
pub const POPUP_CLOSED_BY_USER: &str = "auth/popup-closed-by-user";

/// Shown for any code missing from the table.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            message: code.clone(),
            code,
        }
    }

    pub fn with_message(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The fixed message shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        error_message(&self.code)
    }

    /// Whether the user dismissed the sign-in popup themselves.
    pub fn is_cancellation(&self) -> bool {
        self.code == POPUP_CLOSED_BY_USER
    }
}

/// Translate a provider error code into the message shown to the user.
pub fn error_message(code: &str) -> &'static str {
    match code {
        USER_NOT_FOUND => "No account found with this email.",
        WRONG_PASSWORD => "Incorrect password.",
        EMAIL_ALREADY_IN_USE => "Email already registered.",
        WEAK_PASSWORD => "Password should be at least 6 characters.",
        INVALID_EMAIL => "Invalid email address.",
        TOO_MANY_REQUESTS => "Too many attempts. Try again later.",
        POPUP_CLOSED_BY_USER => "Sign-in cancelled.",
        _ => GENERIC_ERROR_MESSAGE,
    }
}
