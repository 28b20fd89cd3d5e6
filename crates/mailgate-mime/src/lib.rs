//! Message composition for mailgate
//!
//! Turns an [`Email`] into an RFC 2822 message, single-part or
//! `multipart/mixed` with attachments, encoded as URL-safe base64 the way the
//! Gmail `messages.send` endpoint expects it.

mod compose;
mod error;
mod message;
mod mime_types;

pub use compose::{compose, compose_at, encode_raw, render};
pub use error::{ComposeError, MimeResult};
pub use message::{Attachment, Email};
pub use mime_types::{mime_type_for, DEFAULT_MIME_TYPE};
