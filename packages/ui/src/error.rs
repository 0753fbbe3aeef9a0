use api::ProviderError;
use thiserror::Error;

/// Failure of a user-initiated auth operation.
///
/// The user always sees the message for the wrapped [`ProviderError`]; the
/// variant tells callers which step failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFlowError {
    #[error("sign-in failed: {0}")]
    Login(ProviderError),
    #[error("account creation failed: {0}")]
    Register(ProviderError),
    #[error("account created but setting the display name failed: {0}")]
    ProfileUpdate(ProviderError),
    #[error("popup sign-in failed: {0}")]
    Popup(ProviderError),
    #[error("sign-out failed: {0}")]
    SignOut(ProviderError),
}

impl AuthFlowError {
    pub fn provider_error(&self) -> &ProviderError {
        match self {
            AuthFlowError::Login(e)
            | AuthFlowError::Register(e)
            | AuthFlowError::ProfileUpdate(e)
            | AuthFlowError::Popup(e)
            | AuthFlowError::SignOut(e) => e,
        }
    }
}
