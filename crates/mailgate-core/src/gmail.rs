//! Gmail REST API transport
//!
//! Sends via POST /gmail/v1/users/me/messages/send with the composed message
//! in the `raw` field. Works with tokens carrying the gmail.send scope.

use crate::{MailError, MailResult, MailTransport, SubmitReceipt};
use async_trait::async_trait;
use mailgate_auth::{gmail::API_BASE, AuthorizedClient};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize)]
struct SendRequest<'a> {
    raw: &'a str,
}

/// [`MailTransport`] backed by the Gmail API
#[derive(Clone)]
pub struct GmailApi {
    client: AuthorizedClient,
    base_url: String,
}

impl GmailApi {
    /// Send through the public Gmail endpoint
    pub fn new(client: AuthorizedClient) -> Self {
        Self::with_base_url(client, API_BASE)
    }

    /// Send through another API root, e.g. a local stand-in
    pub fn with_base_url(client: AuthorizedClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn send_url(&self) -> String {
        format!("{}/gmail/v1/users/me/messages/send", self.base_url)
    }
}

#[async_trait]
impl MailTransport for GmailApi {
    async fn submit(&self, raw: &str) -> MailResult<SubmitReceipt> {
        let url = self.send_url();
        debug!("Gmail: submitting {} byte message", raw.len());

        let response = self
            .client
            .post(&url)
            .await?
            .json(&SendRequest { raw })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let receipt: SubmitReceipt = response
            .json()
            .await
            .map_err(|e| MailError::Send(format!("Failed to parse response: {}", e)))?;

        info!("Gmail: message accepted, id={} thread={}", receipt.id, receipt.thread_id);
        Ok(receipt)
    }
}
