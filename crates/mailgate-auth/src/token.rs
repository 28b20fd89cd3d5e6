//! OAuth2 token record

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Tokens are treated as expired this long before their actual expiry
const EXPIRY_DELTA_SECS: i64 = 10;

/// Access/refresh token pair as persisted in the token file
///
/// Serialized as `{access_token, token_type, refresh_token, expiry}` with an
/// RFC 3339 `expiry`, the layout other OAuth2 tooling writes as well.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Access token for API calls
    pub access_token: String,
    /// Token type, normally "Bearer"
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Refresh token for obtaining new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Access token expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Create a bearer token that expires `expires_in` from now
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in: Option<Duration>,
    ) -> Self {
        let expiry = expires_in
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| Utc::now() + d);

        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token,
            expiry,
        }
    }

    /// Known expiry time; the zero timestamp some tools write means "none"
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry.filter(|at| at.year() > 1)
    }

    /// Check if the access token is expired or about to expire
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => {
                (expires_at - Utc::now()).num_seconds() < EXPIRY_DELTA_SECS
            }
            None => false,
        }
    }

    /// Whether the token can authorize requests, directly or after a refresh
    pub fn is_usable(&self) -> bool {
        (!self.access_token.is_empty() && !self.is_expired()) || self.refresh_token.is_some()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expiry", &self.expiry)
            .finish()
    }
}
