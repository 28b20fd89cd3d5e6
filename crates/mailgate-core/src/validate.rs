//! Pre-send checks on an [`Email`]

use crate::{MailError, MailResult};
use mailgate_mime::Email;

/// Check that an email is complete enough to send
///
/// Requires at least one `to` recipient, a subject and a body. Every address
/// in to, cc and bcc must contain an `@`; no further address syntax is checked.
pub fn validate_email(email: &Email) -> MailResult<()> {
    if email.to.is_empty() {
        return Err(MailError::Validation(
            "at least one recipient is required".to_string(),
        ));
    }

    if email.subject.is_empty() {
        return Err(MailError::Validation("subject is required".to_string()));
    }

    if email.body.is_empty() {
        return Err(MailError::Validation("email body is required".to_string()));
    }

    if let Some(address) = email.recipients().find(|a| !a.contains('@')) {
        return Err(MailError::Validation(format!(
            "invalid email address: {}",
            address
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Email {
        Email::new("Hi", "Hello").to("a@x.com")
    }

    #[test]
    fn test_valid_email() {
        assert!(validate_email(&valid()).is_ok());
        assert!(validate_email(&valid().cc("b@x.com").bcc("c@x.com")).is_ok());
    }

    #[test]
    fn test_requires_recipient() {
        let err = validate_email(&Email::new("Hi", "Hello")).unwrap_err();
        assert!(matches!(err, MailError::Validation(ref m) if m.contains("recipient")));
    }

    #[test]
    fn test_requires_subject_and_body() {
        let err = validate_email(&Email::new("", "Hello").to("a@x.com")).unwrap_err();
        assert!(matches!(err, MailError::Validation(ref m) if m.contains("subject")));

        let err = validate_email(&Email::new("Hi", "").to("a@x.com")).unwrap_err();
        assert!(matches!(err, MailError::Validation(ref m) if m.contains("body")));
    }

    #[test]
    fn test_rejects_address_without_at() {
        for email in [
            Email::new("Hi", "Hello").to("not-an-address"),
            valid().cc("nobody"),
            valid().bcc("x.com"),
        ] {
            let err = validate_email(&email).unwrap_err();
            assert!(matches!(err, MailError::Validation(ref m) if m.contains("invalid email address")));
        }
    }
}
