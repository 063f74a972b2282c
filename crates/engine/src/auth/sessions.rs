use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use uuid::Uuid;

/// In-memory sessions: opaque token to the signed-in user's email.
///
/// Sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `email` and returns its token.
    pub fn open(&self, email: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), email.to_string());
        token
    }

    /// Email of the user holding `token`.
    pub fn user(&self, token: &str) -> Option<String> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    pub fn close(&self, token: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }
}
