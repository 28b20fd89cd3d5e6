//! Gmail send client

use crate::{validate_email, GmailApi, MailResult, MailTransport, SendResult, SubmitReceipt};
use chrono::Utc;
use mailgate_auth::{AuthConfig, AuthorizationPrompt, CredentialManager};
use mailgate_mime::Email;
use tracing::{info, warn};

/// Validates, composes and submits emails, one attempt per call
pub struct MailClient<T = GmailApi> {
    transport: T,
    credentials: Option<CredentialManager>,
}

impl MailClient<GmailApi> {
    /// Authorize with `config` and send through the Gmail API
    ///
    /// Uses the stored token when it is usable; otherwise `prompt` is asked
    /// for consent and the new token is saved to `config.token_file`.
    pub async fn connect(
        config: AuthConfig,
        prompt: &dyn AuthorizationPrompt,
    ) -> MailResult<Self> {
        let mut credentials = CredentialManager::new(config);
        let client = credentials.authorize(prompt).await?;

        info!("Gmail client ready");
        Ok(Self {
            transport: GmailApi::new(client),
            credentials: Some(credentials),
        })
    }
}

impl<T: MailTransport> MailClient<T> {
    /// Send through an already authorized transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            credentials: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Credential manager, when the client was built by `connect`
    pub fn credentials(&self) -> Option<&CredentialManager> {
        self.credentials.as_ref()
    }

    /// Validate, compose and submit `email`
    ///
    /// Validation and composition failures return before anything reaches
    /// the transport.
    pub async fn try_send(&self, email: &Email) -> MailResult<SubmitReceipt> {
        validate_email(email)?;
        let raw = mailgate_mime::compose(email)?;
        self.transport.submit(&raw).await
    }

    /// Send `email` and report the outcome as a [`SendResult`]
    pub async fn send_email(&self, email: &Email) -> SendResult {
        let mut result = SendResult::started(Utc::now());

        match self.try_send(email).await {
            Ok(receipt) => {
                info!("Email sent, id={}", receipt.id);
                result.success = true;
                result.message_id = receipt.id;
                result.thread_id = receipt.thread_id;
            }
            Err(e) => {
                warn!("Email not sent: {}", e);
                result.error = Some(e.to_string());
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{authorized_client, serve_once};
    use crate::MailError;
    use async_trait::async_trait;
    use base64::prelude::*;
    use mailgate_auth::{AuthError, NoPrompt, Token, TokenStore};
    use mailgate_mime::Attachment;
    use std::sync::Mutex;

    /// Records submitted messages and answers with a fixed outcome
    struct MockTransport {
        submitted: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockTransport {
        fn accepting() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn rejecting() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }

        fn last_message(&self) -> String {
            let raw = self.submitted.lock().unwrap().last().cloned().unwrap();
            String::from_utf8(BASE64_URL_SAFE.decode(raw).unwrap()).unwrap()
        }
    }

    #[async_trait]
    impl MailTransport for MockTransport {
        async fn submit(&self, raw: &str) -> MailResult<SubmitReceipt> {
            self.submitted.lock().unwrap().push(raw.to_string());
            if self.fail {
                return Err(MailError::Api {
                    status: 500,
                    body: "backend error".to_string(),
                });
            }
            Ok(SubmitReceipt {
                id: "msg-1".to_string(),
                thread_id: "thread-1".to_string(),
                label_ids: vec!["SENT".to_string()],
            })
        }
    }

    #[tokio::test]
    async fn test_send_email_success() {
        let client = MailClient::new(MockTransport::accepting());
        let email = Email::new("Hi", "Hello").to("a@x.com");

        let before = Utc::now();
        let result = client.send_email(&email).await;

        assert!(result.success);
        assert_eq!(result.message_id, "msg-1");
        assert_eq!(result.thread_id, "thread-1");
        assert_eq!(result.error, None);
        assert!(result.sent_at >= before && result.sent_at <= Utc::now());

        let message = client.transport().last_message();
        assert!(message.starts_with("To: a@x.com\r\nSubject: Hi\r\n"));
        assert!(message.ends_with("Hello"));
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_transport() {
        let client = MailClient::new(MockTransport::accepting());

        let result = client.send_email(&Email::new("Hi", "Hello")).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("recipient"));

        let err = client
            .try_send(&Email::new("Hi", "Hello").to("a@x.com").cc("broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Validation(_)));

        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_compose_failure_never_reaches_transport() {
        let client = MailClient::new(MockTransport::accepting());
        let email = Email::new("Hi", "Hello")
            .to("a@x.com")
            .attachment(Attachment::new("a.bin", vec![1, 2]).with_mime_type("not a type"));

        let err = client.try_send(&email).await.unwrap_err();

        assert!(matches!(err, MailError::Compose(_)));
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_recorded_once() {
        let client = MailClient::new(MockTransport::rejecting());
        let mut email = Email::new("Report", "See attached").to("a@x.com");
        email.attach_file("report.csv", b"a,b\n1,2\n".to_vec(), None);

        let result = client.send_email(&email).await;

        assert!(!result.success);
        assert!(result.message_id.is_empty());
        assert_eq!(result.error.as_deref(), Some("Gmail API error 500: backend error"));
        assert_eq!(client.transport().calls(), 1);
        assert!(client
            .transport()
            .last_message()
            .contains("Content-Disposition: attachment; filename=report.csv"));
    }

    #[tokio::test]
    async fn test_send_through_gmail_api() {
        let (base, request) = serve_once(200, r#"{"id":"18c1","threadId":"18c0"}"#).await;
        let dir = tempfile::tempdir().unwrap();
        let client = MailClient::new(GmailApi::with_base_url(authorized_client(dir.path()), base));

        let result = client
            .send_email(&Email::new("Hi", "Hello").to("a@x.com"))
            .await;

        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.message_id, "18c1");
        assert_eq!(result.thread_id, "18c0");
        assert!(request.await.unwrap().contains(r#"{"raw":""#));
    }

    #[tokio::test]
    async fn test_connect_without_token_and_no_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = dir.path().join("credentials.json");
        std::fs::write(
            &credentials,
            r#"{"installed":{"client_id":"cid","redirect_uris":["http://localhost"]}}"#,
        )
        .unwrap();

        let err = MailClient::connect(
            AuthConfig::new(&credentials, dir.path().join("token.json")),
            &NoPrompt,
        )
        .await
        .err()
        .unwrap();

        assert!(matches!(err, MailError::Auth(AuthError::ConsentRequired)));
    }

    #[tokio::test]
    async fn test_connect_with_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = dir.path().join("credentials.json");
        std::fs::write(
            &credentials,
            r#"{"installed":{"client_id":"cid","redirect_uris":["http://localhost"]}}"#,
        )
        .unwrap();
        let token_file = dir.path().join("token.json");
        TokenStore::new(&token_file)
            .save(&Token::new("stored", Some("r".to_string()), None))
            .unwrap();

        let client = MailClient::connect(AuthConfig::new(&credentials, &token_file), &NoPrompt)
            .await
            .unwrap();

        let manager = client.credentials().unwrap();
        assert_eq!(manager.state(), mailgate_auth::CredentialState::Authorized);
        assert_eq!(
            manager.client().unwrap().access_token().await.unwrap(),
            "stored"
        );
    }
}
