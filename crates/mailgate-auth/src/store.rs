//! Token persistence
//!
//! Stores the OAuth2 token as a JSON file readable only by the owner.
//! Writes truncate and rewrite the file in place; they are not atomic, and
//! nothing serializes concurrent writers pointed at the same path.

use crate::{AuthError, AuthResult, Token};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed token record
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store for the given token file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a token record exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the stored token
    pub fn load(&self) -> AuthResult<Token> {
        let json = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AuthError::FileNotFound(self.path.clone()),
            _ => AuthError::ReadFailed {
                path: self.path.clone(),
                source: e,
            },
        })?;

        let token: Token = serde_json::from_str(&json).map_err(|e| AuthError::InvalidToken {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        debug!("Loaded OAuth2 token from {}", self.path.display());
        Ok(token)
    }

    /// Write the token, replacing any previous record
    pub fn save(&self, token: &Token) -> AuthResult<()> {
        let json = serde_json::to_string_pretty(token).map_err(|e| AuthError::InvalidToken {
            path: self.path.clone(),
            reason: format!("Failed to serialize token: {}", e),
        })?;

        self.write_private(json.as_bytes())
            .map_err(|source| AuthError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;

        info!("Stored OAuth2 token in {}", self.path.display());
        Ok(())
    }

    /// Delete the stored token, if any
    pub fn delete(&self) -> AuthResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Deleted OAuth2 token {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::WriteFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write_private(&self, contents: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;

        // mode() only applies on creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(contents)?;
        file.write_all(b"\n")?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("token.json"));
        assert!(!store.exists());

        let token = Token::new("access", Some("refresh".to_string()), Some(Duration::from_secs(3600)));
        store.save(&token).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), token);
    }

    #[test]
    fn test_save_truncates_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        store
            .save(&Token::new("a-much-longer-access-token-value", Some("r".repeat(200)), None))
            .unwrap();
        store.save(&Token::new("short", None, None)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token, "short");
        assert_eq!(loaded.refresh_token, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        TokenStore::new(&path).save(&Token::new("a", None, None)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = TokenStore::new(&path);

        let err = store.load().unwrap_err();
        assert!(matches!(&err, AuthError::FileNotFound(p) if *p == path));

        fs::write(&path, "{\"token_type\":\"Bearer\"}").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        store.save(&Token::new("a", None, None)).unwrap();
        store.delete().unwrap();
        assert!(!store.exists());
        store.delete().unwrap();
    }
}
