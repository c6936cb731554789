//! Identity capabilities: issuing credentials on the client, verifying them
//! on the write endpoint.

use crate::ServiceError;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Supplies the current user's identity token.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the token for the signed-in user, or `None` if nobody is
    /// signed in.
    async fn id_token(&self) -> Result<Option<String>, ServiceError>;
}

/// Resolves a bearer token to a user id.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the user id the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an unauthenticated [`ServiceError`] for unknown tokens.
    async fn verify(&self, token: &str) -> Result<String, ServiceError>;
}

/// A fixed credential, typically read from the environment at start-up.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential {
    token: Option<String>,
}

impl StaticCredential {
    /// Creates a credential provider for `token`.
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AuthProvider for StaticCredential {
    #[instrument(skip(self))]
    async fn id_token(&self) -> Result<Option<String>, ServiceError> {
        debug!(signed_in = self.token.is_some(), "Providing identity token");
        Ok(self.token.clone())
    }
}

/// Verifies tokens against a configured token-to-user table.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    /// Creates a verifier accepting exactly the given tokens.
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    #[instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<String, ServiceError> {
        match self.tokens.get(token) {
            Some(user_id) => {
                debug!(user_id = %user_id, "Token verified");
                Ok(user_id.clone())
            }
            None => {
                warn!("Unknown token");
                Err(ServiceError::unauthenticated(
                    "Unauthorized: Missing or invalid token",
                ))
            }
        }
    }
}
