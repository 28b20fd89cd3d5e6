//! Error types for the auth module

use std::path::PathBuf;
use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur during authentication
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configured credentials or token file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A configured file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Token file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Client credentials file is not a usable OAuth2 client export
    #[error("Malformed credentials file {}: {reason}", .path.display())]
    InvalidCredentials { path: PathBuf, reason: String },

    /// Token file cannot be decoded as a token record
    #[error("Malformed token file {}: {reason}", .path.display())]
    InvalidToken { path: PathBuf, reason: String },

    /// User consent is needed but no interactive prompt is available
    #[error("Authorization required but no prompt is available to obtain consent")]
    ConsentRequired,

    /// OAuth2 flow was cancelled by user
    #[error("OAuth2 flow was cancelled")]
    FlowCancelled,

    /// OAuth2 authorization failed
    #[error("OAuth2 authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Token has expired and cannot be refreshed
    #[error("Token has expired")]
    TokenExpired,

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AuthError {
    /// Whether this error comes from missing or unreadable configuration
    /// rather than from the credentials themselves
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidConfig(_) | AuthError::FileNotFound(_) | AuthError::ReadFailed { .. }
        )
    }
}
