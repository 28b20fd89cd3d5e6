//! Outgoing email model

use crate::mime_types::mime_type_for;
use serde::{Deserialize, Serialize};

/// A file attached to an outgoing email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Filename used in the Content-Disposition header and for type inference
    pub filename: String,
    /// Raw file data
    pub content: Vec<u8>,
    /// Explicit MIME type (e.g., "application/pdf")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
            mime_type: None,
        }
    }

    /// Set an explicit MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// MIME type to put on the wire: explicit, inferred from the extension,
    /// or `application/octet-stream`
    pub fn effective_mime_type(&self) -> &str {
        match self.mime_type.as_deref() {
            Some(mime) if !mime.trim().is_empty() => mime,
            _ => mime_type_for(&self.filename),
        }
    }
}

/// Email message to send
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// To addresses
    pub to: Vec<String>,
    /// CC addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    /// BCC addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
    /// Render the body as text/html instead of text/plain
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_html: bool,
    /// File attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// From address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Reply-To address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl Email {
    /// Create a new message builder
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Add a To recipient
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add a CC recipient
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a BCC recipient
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Set the From address
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    /// Set the Reply-To address
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Render the body as HTML
    pub fn html(mut self) -> Self {
        self.is_html = true;
        self
    }

    /// Add an attachment
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Append a To recipient in place
    pub fn add_recipient(&mut self, address: impl Into<String>) -> &mut Self {
        self.to.push(address.into());
        self
    }

    /// Attach a file in place; the MIME type is inferred when `mime_type` is `None`
    pub fn attach_file(
        &mut self,
        filename: impl Into<String>,
        content: Vec<u8>,
        mime_type: Option<&str>,
    ) -> &mut Self {
        self.attachments.push(Attachment {
            filename: filename.into(),
            content,
            mime_type: mime_type.map(str::to_string),
        });
        self
    }

    /// All recipient addresses in header order (To, Cc, Bcc)
    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
    }
}
