//! Mail submission seam

use crate::MailResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What the provider reports for an accepted message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    /// Provider-assigned message ID
    pub id: String,
    /// Provider-assigned thread ID
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub label_ids: Vec<String>,
}

/// Submits an already composed message under an authenticated identity
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Submit a base64url-encoded RFC 2822 message
    async fn submit(&self, raw: &str) -> MailResult<SubmitReceipt>;
}
