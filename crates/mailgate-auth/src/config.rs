//! Credential configuration

use crate::{gmail, AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the client credentials and the user token live, and which scopes to request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth2 client export ("installed application" JSON)
    pub credentials_file: PathBuf,
    /// Persisted user token
    pub token_file: PathBuf,
    /// Requested scopes; empty means the Gmail send-only scope
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new("mailgate_credentials.json", "mailgate_token.json")
    }
}

impl AuthConfig {
    /// Create a configuration requesting the send-only scope
    pub fn new(credentials_file: impl Into<PathBuf>, token_file: impl Into<PathBuf>) -> Self {
        Self {
            credentials_file: credentials_file.into(),
            token_file: token_file.into(),
            scopes: vec![gmail::SEND_SCOPE.to_string()],
        }
    }

    /// Replace the requested scopes
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Scopes to request, falling back to the send-only scope
    pub fn effective_scopes(&self) -> Vec<String> {
        if self.scopes.is_empty() {
            vec![gmail::SEND_SCOPE.to_string()]
        } else {
            self.scopes.clone()
        }
    }

    /// Check that both paths are set, without touching the filesystem
    pub fn validate_paths(&self) -> AuthResult<()> {
        if self.credentials_file.as_os_str().is_empty() {
            return Err(AuthError::InvalidConfig(
                "credentials_file is required".to_string(),
            ));
        }
        if self.token_file.as_os_str().is_empty() {
            return Err(AuthError::InvalidConfig("token_file is required".to_string()));
        }
        Ok(())
    }
}
