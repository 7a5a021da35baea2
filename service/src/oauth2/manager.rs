use std::{collections::HashMap, fmt};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Bearer token for one client registration.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("no authorized client for registration `{0}`")]
    UnknownRegistration(String),
}

/// Supplies access tokens for client registrations.
///
/// Acquiring and refreshing tokens is the manager's business; service
/// groups only ask for a token before each request.
#[async_trait]
pub trait AuthorizedClientManager: Send + Sync + fmt::Debug {
    async fn authorize(&self, registration_id: &str) -> Result<AccessToken, AuthorizationError>;
}

/// Manager backed by a fixed token table.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizedClientManager {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl InMemoryAuthorizedClientManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the token for a registration.
    pub async fn insert(&self, registration_id: impl Into<String>, token: AccessToken) {
        self.tokens.write().await.insert(registration_id.into(), token);
    }

    /// Forget a registration; later requests fail to authorize.
    pub async fn remove(&self, registration_id: &str) -> Option<AccessToken> {
        self.tokens.write().await.remove(registration_id)
    }
}

#[async_trait]
impl AuthorizedClientManager for InMemoryAuthorizedClientManager {
    async fn authorize(&self, registration_id: &str) -> Result<AccessToken, AuthorizationError> {
        self.tokens
            .read()
            .await
            .get(registration_id)
            .cloned()
            .ok_or_else(|| AuthorizationError::UnknownRegistration(registration_id.to_string()))
    }
}
