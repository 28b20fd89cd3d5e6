//! OAuth2 client credentials export parsing
//!
//! Reads the JSON file the Google Cloud Console produces for an OAuth2 client.
//! Both the "installed application" and "web application" layouts are accepted.

use crate::{gmail, AuthError, AuthResult, OAuth2Config};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

#[derive(Debug, Deserialize)]
struct ClientSecret {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    auth_uri: String,
    #[serde(default)]
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

/// Build an OAuth2 configuration from a credentials export
pub fn oauth2_config_from_json(json: &[u8], scopes: &[String]) -> Result<OAuth2Config, String> {
    let file: CredentialsFile = serde_json::from_slice(json).map_err(|e| e.to_string())?;

    let secret = file
        .installed
        .or(file.web)
        .ok_or_else(|| "no \"installed\" or \"web\" client found".to_string())?;

    if secret.client_id.is_empty() {
        return Err("client_id is missing".to_string());
    }
    let redirect_url = secret
        .redirect_uris
        .into_iter()
        .next()
        .ok_or_else(|| "missing redirect URL".to_string())?;

    Ok(OAuth2Config {
        client_id: secret.client_id,
        client_secret: secret.client_secret.filter(|s| !s.is_empty()),
        auth_url: or_default(secret.auth_uri, gmail::AUTH_URL),
        token_url: or_default(secret.token_uri, gmail::TOKEN_URL),
        redirect_url,
        scopes: scopes.to_vec(),
    })
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Read and parse a credentials file
pub fn read_credentials(path: &Path, scopes: &[String]) -> AuthResult<OAuth2Config> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AuthError::FileNotFound(path.to_path_buf()),
        _ => AuthError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let config = oauth2_config_from_json(&bytes, scopes).map_err(|reason| {
        AuthError::InvalidCredentials {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    debug!("Loaded OAuth2 client credentials from {}", path.display());
    Ok(config)
}
