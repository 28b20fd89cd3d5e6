//! Helpers for exercising the Gmail transport against a local server

use mailgate_auth::{AuthorizedClient, OAuth2Config, OAuth2Flow, Token, TokenStore};
use std::path::Path;

pub use mailgate_auth::test_support::serve_once;

/// Client holding a non-expiring "access" token; refreshes would go nowhere
pub fn authorized_client(dir: &Path) -> AuthorizedClient {
    let flow = OAuth2Flow::new(OAuth2Config {
        client_id: "client-id".to_string(),
        client_secret: None,
        auth_url: "https://accounts.example.com/o/oauth2/auth".to_string(),
        token_url: "http://127.0.0.1:9/token".to_string(),
        redirect_url: "http://localhost".to_string(),
        scopes: vec![],
    })
    .unwrap();

    AuthorizedClient::new(
        flow,
        Token::new("access", None, None),
        TokenStore::new(dir.join("token.json")),
    )
}
