//! Credential sign-in.
//!
//! [`authenticate`] hands the submitted credentials to an
//! [`IdentityProvider`] and sorts its answer into three outcomes:
//!
//! - success: redirect to the target the provider produced;
//! - invalid credentials: the [`CREDENTIALS_SIGNIN`] code, returned;
//! - anything else: an [`AuthError`], propagated.

use async_trait::async_trait;
use thiserror::Error;

use crate::FormData;

pub use credentials::CredentialsProvider;
pub use password::{hash_password, verify_password};
pub use sessions::SessionStore;

mod credentials;
mod password;
mod sessions;

/// Code returned to the login form when the credentials are rejected.
pub const CREDENTIALS_SIGNIN: &str = "CredentialsSignin";

/// Where to land after signing in when the form does not say.
pub const DEFAULT_REDIRECT: &str = "/dashboard";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub redirect_to: Option<String>,
}

impl Credentials {
    /// Reads `email`, `password` and `redirectTo` from a login form.
    pub fn from_form(form: &FormData) -> Self {
        let field = |name: &str| form.get(name).cloned().unwrap_or_default();
        Self {
            email: field("email"),
            password: field("password"),
            redirect_to: form.get("redirectTo").filter(|v| !v.is_empty()).cloned(),
        }
    }
}

/// A successful sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignIn {
    pub redirect_to: String,
    /// Session token issued by the provider, if it keeps sessions.
    pub session: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("CredentialsSignin")]
    CredentialsSignin,
    #[error("{0}")]
    Failed(String),
}

impl ProviderError {
    /// `true` for rejected credentials.
    ///
    /// Providers that only report a message are matched on it containing
    /// [`CREDENTIALS_SIGNIN`].
    pub fn is_credentials_signin(&self) -> bool {
        match self {
            Self::CredentialsSignin => true,
            Self::Failed(message) => message.contains(CREDENTIALS_SIGNIN),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider failed: {0}")]
    Provider(#[source] ProviderError),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError>;

    /// Ends a session issued by [`IdentityProvider::sign_in`].
    async fn sign_out(&self, _session: &str) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Redirect(SignIn),
    Failed(&'static str),
}

/// Signs in with the credentials carried by `form`.
///
/// Rejected credentials are an ordinary outcome; every other provider
/// failure is returned as an error for the host to treat as fatal.
pub async fn authenticate(
    provider: &dyn IdentityProvider,
    form: &FormData,
) -> Result<AuthOutcome, AuthError> {
    let credentials = Credentials::from_form(form);
    match provider.sign_in(&credentials).await {
        Ok(sign_in) => Ok(AuthOutcome::Redirect(sign_in)),
        Err(err) if err.is_credentials_signin() => {
            tracing::info!(email = %credentials.email, "sign-in rejected");
            Ok(AuthOutcome::Failed(CREDENTIALS_SIGNIN))
        }
        Err(err) => Err(AuthError::Provider(err)),
    }
}
