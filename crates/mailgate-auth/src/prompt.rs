//! Operator consent prompts
//!
//! The consent step needs someone to open the authorization URL and hand the
//! code back. How that happens depends on where the library runs, so it is a
//! pluggable capability.

use crate::{AuthError, AuthResult};
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Obtains an authorization code for a given authorization URL
#[async_trait]
pub trait AuthorizationPrompt: Send + Sync {
    /// Present `auth_url` and return the code (or redirect URL) the user pastes back
    async fn authorization_code(&self, auth_url: &str) -> AuthResult<String>;

    /// Report progress to the operator
    fn notify(&self, _message: &str) {}
}

/// Interactive prompt on stdin/stdout
///
/// Blocks the calling task until a line is entered; run it off any request
/// path that must stay responsive.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

#[async_trait]
impl AuthorizationPrompt for ConsolePrompt {
    async fn authorization_code(&self, auth_url: &str) -> AuthResult<String> {
        println!(
            "Go to the following URL and authorize the application:\n{}\n",
            auth_url
        );
        print!("Enter the authorization code: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;

        if read == 0 || line.trim().is_empty() {
            return Err(AuthError::FlowCancelled);
        }

        Ok(line.trim().to_string())
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

/// Supplies a code fetched ahead of time
#[derive(Debug, Clone)]
pub struct StaticCodePrompt {
    code: String,
}

impl StaticCodePrompt {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

#[async_trait]
impl AuthorizationPrompt for StaticCodePrompt {
    async fn authorization_code(&self, _auth_url: &str) -> AuthResult<String> {
        Ok(self.code.clone())
    }
}

/// Fails immediately instead of waiting for consent
///
/// For unattended processes that must run from a pre-provisioned token file.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

#[async_trait]
impl AuthorizationPrompt for NoPrompt {
    async fn authorization_code(&self, _auth_url: &str) -> AuthResult<String> {
        Err(AuthError::ConsentRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_prompt_returns_code() {
        let prompt = StaticCodePrompt::new("4/0Abc");
        assert_eq!(prompt.authorization_code("https://auth").await.unwrap(), "4/0Abc");
    }

    #[tokio::test]
    async fn test_no_prompt_fails_fast() {
        let err = NoPrompt.authorization_code("https://auth").await.unwrap_err();
        assert!(matches!(err, AuthError::ConsentRequired));
    }
}
