//! Gmail send client for mailgate
//!
//! Ties the pieces together: emails are validated, composed into RFC 2822
//! messages by `mailgate-mime`, and submitted to the Gmail API over the
//! authorized transport from `mailgate-auth`.

mod client;
mod error;
mod gmail;
mod result;
mod transport;
mod validate;

#[cfg(test)]
mod test_support;

pub use client::MailClient;
pub use error::{MailError, MailResult};
pub use gmail::GmailApi;
pub use result::SendResult;
pub use transport::{MailTransport, SubmitReceipt};
pub use validate::validate_email;

pub use mailgate_auth::{
    AuthConfig, AuthError, AuthorizationPrompt, ConsolePrompt, CredentialManager, NoPrompt,
    StaticCodePrompt,
};
pub use mailgate_mime::{Attachment, ComposeError, Email};
