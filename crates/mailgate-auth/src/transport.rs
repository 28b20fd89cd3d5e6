//! HTTP client that authorizes every request with the current access token

use crate::{AuthError, AuthResult, OAuth2Flow, Token, TokenStore};
use reqwest::{Method, RequestBuilder};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

struct Inner {
    http: reqwest::Client,
    flow: OAuth2Flow,
    store: TokenStore,
    token: Mutex<Token>,
}

/// Authorized HTTP transport
///
/// Expired access tokens are refreshed through the OAuth2 client on demand,
/// and the refreshed token is written back to the token file. Cloning is cheap
/// and clones share the same token.
#[derive(Clone)]
pub struct AuthorizedClient {
    inner: Arc<Inner>,
}

impl AuthorizedClient {
    /// Wrap a token obtained by `flow`, persisting refreshes to `store`
    pub fn new(flow: OAuth2Flow, token: Token, store: TokenStore) -> Self {
        Self::with_http_client(reqwest::Client::new(), flow, token, store)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        flow: OAuth2Flow,
        token: Token,
        store: TokenStore,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                flow,
                store,
                token: Mutex::new(token),
            }),
        }
    }

    /// Snapshot of the token currently in use
    pub async fn token(&self) -> Token {
        self.inner.token.lock().await.clone()
    }

    /// A valid access token, refreshing it first if needed
    pub async fn access_token(&self) -> AuthResult<String> {
        let mut token = self.inner.token.lock().await;

        if !token.access_token.is_empty() && !token.is_expired() {
            return Ok(token.access_token.clone());
        }

        let refresh_token = token.refresh_token.clone().ok_or(AuthError::TokenExpired)?;

        info!("Access token expired, refreshing");
        let refreshed = self.inner.flow.refresh_token(&refresh_token).await?;

        if let Err(e) = self.inner.store.save(&refreshed) {
            warn!("Refreshed token could not be persisted: {}", e);
        }

        *token = refreshed;
        Ok(token.access_token.clone())
    }

    /// Start a request carrying the bearer token
    pub async fn request(&self, method: Method, url: &str) -> AuthResult<RequestBuilder> {
        let access_token = self.access_token().await?;
        Ok(self.inner.http.request(method, url).bearer_auth(access_token))
    }

    /// Start an authorized POST request
    pub async fn post(&self, url: &str) -> AuthResult<RequestBuilder> {
        self.request(Method::POST, url).await
    }
}

impl fmt::Debug for AuthorizedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("client_id", &self.inner.flow.config().client_id)
            .field("token_file", &self.inner.store.path())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use crate::OAuth2Config;
    use std::time::Duration;

    fn flow(token_url: &str) -> OAuth2Flow {
        OAuth2Flow::new(OAuth2Config {
            client_id: "client-id".to_string(),
            client_secret: Some("client-secret".to_string()),
            auth_url: "https://accounts.example.com/o/oauth2/auth".to_string(),
            token_url: token_url.to_string(),
            redirect_url: "http://localhost".to_string(),
            scopes: vec![],
        })
        .unwrap()
    }

    fn expired(refresh_token: Option<&str>) -> Token {
        let mut token = Token::new("stale", refresh_token.map(str::to_string), None);
        token.expiry = Some(chrono::Utc::now() - chrono::Duration::seconds(30));
        token
    }

    #[tokio::test]
    async fn test_valid_token_is_used_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let token = Token::new("current", None, Some(Duration::from_secs(3600)));

        // Port 9 (discard) would fail any refresh attempt
        let client = AuthorizedClient::new(flow("http://127.0.0.1:9/token"), token, store.clone());

        assert_eq!(client.access_token().await.unwrap(), "current");
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_persisted() {
        let (base, _request) = serve_once(
            200,
            r#"{"access_token":"renewed","token_type":"Bearer","expires_in":3600}"#,
        )
        .await;

        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let client = AuthorizedClient::new(
            flow(&format!("{}/token", base)),
            expired(Some("long-lived")),
            store.clone(),
        );

        assert_eq!(client.access_token().await.unwrap(), "renewed");

        let persisted = store.load().unwrap();
        assert_eq!(persisted.access_token, "renewed");
        assert_eq!(persisted.refresh_token.as_deref(), Some("long-lived"));
        assert_eq!(client.token().await, persisted);
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let client = AuthorizedClient::new(flow("http://127.0.0.1:9/token"), expired(None), store);

        let err = client.access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_debug_hides_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let client = AuthorizedClient::new(
            flow("http://127.0.0.1:9/token"),
            Token::new("secret-access", Some("secret-refresh".to_string()), None),
            store,
        );

        let debug = format!("{:?}", client);
        assert!(debug.contains("client-id"));
        assert!(debug.contains("token.json"));
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }

    #[tokio::test]
    async fn test_requests_carry_bearer_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let client = AuthorizedClient::new(
            flow("http://127.0.0.1:9/token"),
            Token::new("current", None, None),
            store,
        );

        let request = client
            .post("https://example.com/send")
            .await
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer current"
        );
    }
}
