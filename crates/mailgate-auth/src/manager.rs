//! Credential lifecycle: load a stored token or run the consent flow

use crate::credentials::read_credentials;
use crate::{
    AuthConfig, AuthError, AuthResult, AuthorizationPrompt, AuthorizedClient, OAuth2Config,
    OAuth2Flow, Token, TokenStore,
};
use std::fmt;
use tracing::{info, warn};

/// Where a [`CredentialManager`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// Nothing loaded yet
    Unconfigured,
    /// No usable token; waiting for the user to authorize the application
    AwaitingConsent,
    /// Holding a token and an authorized transport
    Authorized,
}

impl fmt::Display for CredentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CredentialState::Unconfigured => "unconfigured",
            CredentialState::AwaitingConsent => "awaiting consent",
            CredentialState::Authorized => "authorized",
        };
        f.write_str(name)
    }
}

/// Load client credentials and the stored token, without any interaction
///
/// Both files must already exist.
pub fn load_config(config: &AuthConfig) -> AuthResult<(OAuth2Config, Token)> {
    config.validate_paths()?;

    if !config.credentials_file.exists() {
        return Err(AuthError::FileNotFound(config.credentials_file.clone()));
    }
    if !config.token_file.exists() {
        return Err(AuthError::FileNotFound(config.token_file.clone()));
    }

    let oauth_config = read_credentials(&config.credentials_file, &config.effective_scopes())?;
    let token = TokenStore::new(&config.token_file).load()?;

    Ok((oauth_config, token))
}

/// Run the consent flow and persist the resulting token
pub async fn obtain_token(
    config: &AuthConfig,
    prompt: &dyn AuthorizationPrompt,
) -> AuthResult<Token> {
    config.validate_paths()?;

    let oauth_config = read_credentials(&config.credentials_file, &config.effective_scopes())?;
    let mut flow = OAuth2Flow::new(oauth_config)?;
    let store = TokenStore::new(&config.token_file);

    request_consent(&mut flow, &store, prompt).await
}

async fn request_consent(
    flow: &mut OAuth2Flow,
    store: &TokenStore,
    prompt: &dyn AuthorizationPrompt,
) -> AuthResult<Token> {
    let auth_url = flow.get_auth_url();
    info!("Requesting user authorization");

    let code = prompt.authorization_code(&auth_url).await?;
    let token = flow.exchange_code(&code).await?;

    prompt.notify(&format!("Saving token to: {}", store.path().display()));
    store.save(&token)?;

    Ok(token)
}

/// Owns the OAuth2 credentials for one client and one user token
pub struct CredentialManager {
    config: AuthConfig,
    state: CredentialState,
    client: Option<AuthorizedClient>,
}

impl CredentialManager {
    /// Create an unconfigured manager
    pub fn new(mut config: AuthConfig) -> Self {
        config.scopes = config.effective_scopes();
        Self {
            config,
            state: CredentialState::Unconfigured,
            client: None,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn state(&self) -> CredentialState {
        self.state
    }

    /// Authorized transport, once [`authorize`](Self::authorize) has succeeded
    pub fn client(&self) -> Option<&AuthorizedClient> {
        self.client.as_ref()
    }

    /// Produce an authorized transport
    ///
    /// Uses the stored token when there is a usable one. Otherwise asks
    /// `prompt` for consent, exchanges the code and stores the new token.
    pub async fn authorize(
        &mut self,
        prompt: &dyn AuthorizationPrompt,
    ) -> AuthResult<AuthorizedClient> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        self.config.validate_paths()?;

        let oauth_config = read_credentials(&self.config.credentials_file, &self.config.scopes)?;
        let mut flow = OAuth2Flow::new(oauth_config)?;
        let store = TokenStore::new(&self.config.token_file);

        let stored = match store.load() {
            Ok(token) if token.is_usable() => Some(token),
            Ok(_) => {
                warn!("Stored token in {} is no longer usable", store.path().display());
                None
            }
            Err(AuthError::FileNotFound(_)) => None,
            Err(e @ AuthError::InvalidToken { .. }) => {
                warn!("Ignoring stored token: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        let token = match stored {
            Some(token) => {
                info!("Using stored token from {}", store.path().display());
                token
            }
            None => {
                self.state = CredentialState::AwaitingConsent;
                request_consent(&mut flow, &store, prompt).await?
            }
        };

        let client = AuthorizedClient::new(flow, token, store);
        self.client = Some(client.clone());
        self.state = CredentialState::Authorized;

        Ok(client)
    }
}
