//! Error types for message composition

use thiserror::Error;

/// Result type for composition operations
pub type MimeResult<T> = Result<T, ComposeError>;

/// Errors that can occur while composing a message
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Attachment carries a MIME type that cannot be used as a Content-Type header
    #[error("Invalid content type {mime_type:?} for attachment {filename}: {reason}")]
    InvalidContentType {
        filename: String,
        mime_type: String,
        reason: String,
    },

    /// Attachment filename cannot be written into a header
    #[error("Invalid attachment filename {filename:?}: {reason}")]
    InvalidFilename { filename: String, reason: String },
}

impl ComposeError {
    /// Filename of the attachment whose part could not be written
    pub fn filename(&self) -> &str {
        match self {
            ComposeError::InvalidContentType { filename, .. } => filename,
            ComposeError::InvalidFilename { filename, .. } => filename,
        }
    }
}
