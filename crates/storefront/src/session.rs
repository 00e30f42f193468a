//! Demo authentication: a bearer token and nothing else.

use crate::store::{LocalStore, StoreError, TOKEN_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    token: Option<String>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn load(store: &dyn LocalStore) -> Result<Self, StoreError> {
        let token = store.get(TOKEN_KEY)?.filter(|t| !t.trim().is_empty());
        Ok(Self { token })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_in(&mut self, store: &dyn LocalStore, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        store.set(TOKEN_KEY, &token)?;
        self.token = Some(token);
        tracing::info!("signed in");
        Ok(())
    }

    pub fn sign_out(&mut self, store: &dyn LocalStore) -> Result<(), StoreError> {
        store.remove(TOKEN_KEY)?;
        self.token = None;
        tracing::info!("signed out");
        Ok(())
    }
}
