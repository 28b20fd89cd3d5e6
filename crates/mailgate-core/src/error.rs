//! Error types for the mail client

use thiserror::Error;

/// Result type for mail client operations
pub type MailResult<T> = Result<T, MailError>;

/// Errors that can occur while sending mail
#[derive(Debug, Error)]
pub enum MailError {
    /// The email failed validation; nothing was sent
    #[error("Invalid email: {0}")]
    Validation(String),

    /// The email could not be turned into a MIME message
    #[error("Failed to compose message: {0}")]
    Compose(#[from] mailgate_mime::ComposeError),

    /// Credentials could not be loaded, obtained or refreshed
    #[error("Authentication error: {0}")]
    Auth(#[from] mailgate_auth::AuthError),

    /// The request to the mail API did not complete
    #[error("Failed to send email: {0}")]
    Send(String),

    /// The mail API rejected the message
    #[error("Gmail API error {status}: {body}")]
    Api { status: u16, body: String },
}

impl From<reqwest::Error> for MailError {
    fn from(e: reqwest::Error) -> Self {
        MailError::Send(e.to_string())
    }
}
