//! Three-legged OAuth2 authorization code flow
//!
//! The user visits the authorization URL, grants access, and hands the
//! resulting code back (either the bare code or the whole redirect URL).
//! The code is then exchanged for an access/refresh token pair.

use crate::{AuthError, AuthResult, Token};
use oauth2::{
    basic::{BasicClient, BasicTokenResponse},
    reqwest::async_http_client,
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, RefreshToken,
    Scope, TokenResponse, TokenUrl,
};
use tracing::{debug, info};

/// OAuth2 provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Config {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret (installed apps may omit it)
    pub client_secret: Option<String>,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Redirect URL registered for the client
    pub redirect_url: String,
    /// Required scopes
    pub scopes: Vec<String>,
}

/// Manages an OAuth2 authorization flow
pub struct OAuth2Flow {
    config: OAuth2Config,
    client: BasicClient,
    csrf_token: Option<CsrfToken>,
}

impl OAuth2Flow {
    /// Create a new OAuth2 flow
    pub fn new(config: OAuth2Config) -> AuthResult<Self> {
        let client_id = ClientId::new(config.client_id.clone());
        let client_secret = config.client_secret.clone().map(ClientSecret::new);
        let auth_url = AuthUrl::new(config.auth_url.clone())
            .map_err(|e| AuthError::InvalidConfig(format!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(config.token_url.clone())
            .map_err(|e| AuthError::InvalidConfig(format!("Invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(config.redirect_url.clone())
            .map_err(|e| AuthError::InvalidConfig(format!("Invalid redirect URL: {}", e)))?;

        let client = BasicClient::new(client_id, client_secret, auth_url, Some(token_url))
            .set_redirect_uri(redirect_url);

        Ok(Self {
            config,
            client,
            csrf_token: None,
        })
    }

    /// Provider configuration this flow was built from
    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    /// Generate the authorization URL for the user to visit
    ///
    /// Requests offline access so the token endpoint also returns a refresh token.
    pub fn get_auth_url(&mut self) -> String {
        let mut auth_request = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_extra_param("access_type", "offline");

        for scope in &self.config.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request.url();
        self.csrf_token = Some(csrf_token);

        auth_url.to_string()
    }

    /// Exchange what the user pasted back for a token
    pub async fn exchange_code(&mut self, input: &str) -> AuthResult<Token> {
        let csrf_token = self
            .csrf_token
            .take()
            .ok_or_else(|| AuthError::InvalidConfig("Auth URL not generated".to_string()))?;

        let code = parse_authorization_input(input, csrf_token.secret())?;

        debug!("Exchanging authorization code at {}", self.config.token_url);
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        info!("OAuth2 authorization code exchanged");
        Ok(token_from_response(&token_response, None))
    }

    /// Refresh an access token using a refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AuthResult<Token> {
        let token_response = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        Ok(token_from_response(&token_response, Some(refresh_token)))
    }
}

/// Keep the previous refresh token when the server does not rotate it
fn token_from_response(response: &BasicTokenResponse, previous_refresh: Option<&str>) -> Token {
    let refresh_token = response
        .refresh_token()
        .map(|t| t.secret().clone())
        .or_else(|| previous_refresh.map(str::to_string));

    Token::new(
        response.access_token().secret().clone(),
        refresh_token,
        response.expires_in(),
    )
}

/// Extract the authorization code from user input
///
/// Accepts a bare code or the full redirect URL the browser landed on.
/// A redirect URL must carry the state issued with the authorization URL.
fn parse_authorization_input(input: &str, expected_state: &str) -> AuthResult<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AuthError::FlowCancelled);
    }

    let url = match url::Url::parse(input) {
        Ok(url) if url.query().is_some() => url,
        _ => return Ok(input.to_string()),
    };

    let mut code = None;
    let mut state = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "state" => state = Some(value.to_string()),
            "error" => {
                let description = url
                    .query_pairs()
                    .find(|(k, _)| k == "error_description")
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_else(|| value.to_string());
                return Err(AuthError::AuthorizationFailed(description));
            }
            _ => {}
        }
    }

    let code = code.ok_or_else(|| {
        AuthError::AuthorizationFailed("Missing code in redirect URL".to_string())
    })?;

    if state.as_deref() != Some(expected_state) {
        return Err(AuthError::AuthorizationFailed(
            "CSRF token mismatch".to_string(),
        ));
    }

    Ok(code)
}
