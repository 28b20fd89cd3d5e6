//! OAuth2 credential management for mailgate
//!
//! Covers the three-legged authorization code flow against Google's
//! endpoints, persistence of the resulting token, and an HTTP transport
//! that attaches (and refreshes) the bearer token:
//!
//! - [`CredentialManager`] loads the stored token or runs the consent flow
//! - [`TokenStore`] reads and writes the token file
//! - [`AuthorizedClient`] issues authorized requests

mod config;
mod credentials;
mod error;
mod flow;
mod manager;
mod prompt;
mod store;
mod token;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::AuthConfig;
pub use credentials::{oauth2_config_from_json, read_credentials};
pub use error::{AuthError, AuthResult};
pub use flow::{OAuth2Config, OAuth2Flow};
pub use manager::{load_config, obtain_token, CredentialManager, CredentialState};
pub use prompt::{AuthorizationPrompt, ConsolePrompt, NoPrompt, StaticCodePrompt};
pub use store::TokenStore;
pub use token::Token;
pub use transport::AuthorizedClient;

/// Gmail OAuth2 and API endpoints
pub mod gmail {
    /// Scope that permits sending mail and nothing else
    pub const SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

    /// Google authorization endpoint
    pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

    /// Google token endpoint
    pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

    /// Gmail REST API root
    pub const API_BASE: &str = "https://gmail.googleapis.com";
}
