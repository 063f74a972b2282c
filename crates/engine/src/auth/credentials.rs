use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use validator::Validate;

use crate::users;

use super::{
    Credentials, DEFAULT_REDIRECT, IdentityProvider, ProviderError, SessionStore, SignIn,
    verify_password,
};

#[derive(Debug, Validate)]
struct SignInInput {
    #[validate(email)]
    email: String,
    #[validate(length(min = 6))]
    password: String,
}

/// Email + password sign-in against the `users` table.
///
/// Malformed input, an unknown email and a wrong password are all reported
/// the same way, as [`ProviderError::CredentialsSignin`].
#[derive(Clone, Debug)]
pub struct CredentialsProvider {
    database: DatabaseConnection,
    sessions: Arc<SessionStore>,
}

impl CredentialsProvider {
    pub fn new(database: DatabaseConnection, sessions: Arc<SessionStore>) -> Self {
        Self { database, sessions }
    }

    async fn user(&self, email: &str) -> Result<Option<users::Model>, ProviderError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await
            .map_err(|err| ProviderError::Failed(format!("failed to fetch user: {err}")))
    }
}

/// Only same-site paths are followed after sign-in.
fn redirect_target(requested: Option<&str>) -> String {
    match requested {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => DEFAULT_REDIRECT.to_string(),
    }
}

#[async_trait]
impl IdentityProvider for CredentialsProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError> {
        let input = SignInInput {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        };
        if input.validate().is_err() {
            return Err(ProviderError::CredentialsSignin);
        }

        let Some(user) = self.user(&credentials.email).await? else {
            return Err(ProviderError::CredentialsSignin);
        };
        if !verify_password(&credentials.password, &user.password) {
            return Err(ProviderError::CredentialsSignin);
        }

        tracing::info!(email = %user.email, "user signed in");
        Ok(SignIn {
            redirect_to: redirect_target(credentials.redirect_to.as_deref()),
            session: Some(self.sessions.open(&user.email)),
        })
    }

    async fn sign_out(&self, session: &str) {
        self.sessions.close(session);
    }
}
