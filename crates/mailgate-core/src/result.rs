//! Per-attempt send record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one send attempt
///
/// Produced for failures as well as successes so callers can log every
/// attempt the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(default)]
    pub message_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thread_id: String,
    /// When the attempt started
    pub sent_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    pub(crate) fn started(sent_at: DateTime<Utc>) -> Self {
        Self {
            success: false,
            message_id: String::new(),
            thread_id: String::new(),
            sent_at,
            error: None,
        }
    }
}
