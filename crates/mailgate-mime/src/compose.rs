//! RFC 2822 message rendering
//!
//! Messages without attachments are written as a single text part. Anything
//! with attachments becomes `multipart/mixed`: the body first, then one
//! base64 part per attachment.

use crate::{Attachment, ComposeError, Email, MimeResult};
use base64::prelude::*;
use chrono::{DateTime, FixedOffset, Local};
use lettre::message::header::ContentType;
use rand::Rng;
use std::borrow::Cow;
use tracing::debug;

/// Maximum length of a base64 body line (RFC 2045)
const LINE_WIDTH: usize = 76;

/// Bytes of subject text per RFC 2047 encoded-word, keeps each word under 75 chars
const ENCODED_WORD_BYTES: usize = 45;

/// Compose an email into a base64url payload, dated now
pub fn compose(email: &Email) -> MimeResult<String> {
    compose_at(email, Local::now().fixed_offset())
}

/// Compose an email into a base64url payload with an explicit Date header
pub fn compose_at(email: &Email, date: DateTime<FixedOffset>) -> MimeResult<String> {
    let raw = render(email, &date)?;
    Ok(encode_raw(&raw))
}

/// Encode a rendered message for the Gmail `raw` field (URL-safe, padded)
pub fn encode_raw(message: &[u8]) -> String {
    BASE64_URL_SAFE.encode(message)
}

/// Render the RFC 2822 message bytes without transport encoding
pub fn render(email: &Email, date: &DateTime<FixedOffset>) -> MimeResult<Vec<u8>> {
    if email.attachments.is_empty() {
        Ok(render_simple(email, date).into_bytes())
    } else {
        let boundary = new_boundary();
        render_multipart(email, date, &boundary).map(String::into_bytes)
    }
}

fn render_simple(email: &Email, date: &DateTime<FixedOffset>) -> String {
    let mut out = String::with_capacity(email.body.len() + 256);

    write_envelope(&mut out, email, date);
    write_header(&mut out, "Content-Type", body_content_type(email));
    out.push_str("\r\n");
    out.push_str(&email.body);

    debug!("Rendered single-part message ({} bytes)", out.len());
    out
}

fn render_multipart(
    email: &Email,
    date: &DateTime<FixedOffset>,
    boundary: &str,
) -> MimeResult<String> {
    let mut out = String::with_capacity(email.body.len() + 512);

    write_envelope(&mut out, email, date);
    write_header(&mut out, "MIME-Version", "1.0");
    write_header(
        &mut out,
        "Content-Type",
        &format!("multipart/mixed; boundary={}", boundary),
    );
    out.push_str("\r\n");

    // Body part
    out.push_str(&format!("--{}\r\n", boundary));
    write_header(&mut out, "Content-Type", body_content_type(email));
    out.push_str("\r\n");
    out.push_str(&email.body);

    for attachment in &email.attachments {
        out.push_str(&format!("\r\n--{}\r\n", boundary));
        write_attachment(&mut out, attachment)?;
    }

    out.push_str(&format!("\r\n--{}--\r\n", boundary));

    debug!(
        "Rendered multipart message with {} attachment(s) ({} bytes)",
        email.attachments.len(),
        out.len()
    );
    Ok(out)
}

/// Write the addressing headers shared by both message shapes
fn write_envelope(out: &mut String, email: &Email, date: &DateTime<FixedOffset>) {
    write_header(out, "To", &single_line(&email.to.join(", ")));

    if !email.cc.is_empty() {
        write_header(out, "Cc", &single_line(&email.cc.join(", ")));
    }

    if !email.bcc.is_empty() {
        write_header(out, "Bcc", &single_line(&email.bcc.join(", ")));
    }

    if let Some(from) = email.from.as_deref().filter(|f| !f.is_empty()) {
        write_header(out, "From", &single_line(from));
    }

    if let Some(reply_to) = email.reply_to.as_deref().filter(|r| !r.is_empty()) {
        write_header(out, "Reply-To", &single_line(reply_to));
    }

    write_header(out, "Subject", &encode_subject(&single_line(&email.subject)));
    write_header(out, "Date", &date.to_rfc2822());
}

fn write_attachment(out: &mut String, attachment: &Attachment) -> MimeResult<()> {
    let filename = &attachment.filename;

    if filename.trim().is_empty() {
        return Err(ComposeError::InvalidFilename {
            filename: filename.clone(),
            reason: "filename is empty".to_string(),
        });
    }

    if filename.chars().any(char::is_control) {
        return Err(ComposeError::InvalidFilename {
            filename: filename.clone(),
            reason: "filename contains control characters".to_string(),
        });
    }

    let mime_type = attachment.effective_mime_type();
    ContentType::parse(mime_type).map_err(|e| ComposeError::InvalidContentType {
        filename: filename.clone(),
        mime_type: mime_type.to_string(),
        reason: e.to_string(),
    })?;

    write_header(out, "Content-Type", mime_type);
    write_header(
        out,
        "Content-Disposition",
        &format!("attachment; {}", filename_params(filename)),
    );
    write_header(out, "Content-Transfer-Encoding", "base64");
    out.push_str("\r\n");
    out.push_str(&wrap_base64(&attachment.content));

    Ok(())
}

fn write_header(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str("\r\n");
}

/// Flatten stray line breaks so a caller-supplied value stays on its header line
fn single_line(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn body_content_type(email: &Email) -> &'static str {
    if email.is_html {
        "text/html; charset=UTF-8"
    } else {
        "text/plain; charset=UTF-8"
    }
}

/// ASCII subjects go out verbatim, anything else as RFC 2047 encoded-words
fn encode_subject(subject: &str) -> String {
    if subject.is_ascii() {
        return subject.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for ch in subject.chars() {
        if !chunk.is_empty() && chunk.len() + ch.len_utf8() > ENCODED_WORD_BYTES {
            words.push(encoded_word(&chunk));
            chunk.clear();
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        words.push(encoded_word(&chunk));
    }

    words.join("\r\n ")
}

fn encoded_word(text: &str) -> String {
    format!("=?UTF-8?B?{}?=", BASE64_STANDARD.encode(text))
}

/// `filename` parameter(s) for Content-Disposition
///
/// Non-ASCII names get an ASCII fallback plus an RFC 2231 `filename*`.
fn filename_params(filename: &str) -> String {
    if filename.is_ascii() {
        return format!("filename={}", quote_filename(filename));
    }

    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    format!(
        "filename={}; filename*=UTF-8''{}",
        quote_filename(&fallback),
        percent_encode(filename)
    )
}

/// RFC 2231 extended value: everything outside attr-char is %XX
fn percent_encode(value: &str) -> String {
    const ATTR_SPECIALS: &[u8] = b"!#$&+-.^_`|~";

    let mut encoded = String::with_capacity(value.len() * 3);
    for &byte in value.as_bytes() {
        if byte.is_ascii_alphanumeric() || ATTR_SPECIALS.contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Quote a filename parameter when it holds spaces or MIME specials
fn quote_filename(filename: &str) -> String {
    const SPECIALS: &[char] = &[
        '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=', ' ',
    ];

    if filename.is_ascii() && !filename.contains(SPECIALS) {
        return filename.to_string();
    }

    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn wrap_base64(data: &[u8]) -> String {
    let encoded = BASE64_STANDARD.encode(data);
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / LINE_WIDTH * 2);

    for (i, ch) in encoded.chars().enumerate() {
        if i > 0 && i % LINE_WIDTH == 0 {
            wrapped.push_str("\r\n");
        }
        wrapped.push(ch);
    }

    wrapped
}

/// 60 hex characters, same shape as common multipart writers produce
fn new_boundary() -> String {
    let bytes: [u8; 30] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
