use crate::domain::ports::TokenStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Token kept in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save_token(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn get_token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn remove_token(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as a small JSON file so the CLI stays logged in between runs.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the stored token was written, if there is one.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.read().map(|stored| stored.saved_at)
    }

    fn read(&self) -> Option<StoredToken> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read token file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&data) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!("Ignoring corrupt token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn write(&self, token: &str) -> crate::utils::error::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn save_token(&self, token: &str) {
        if let Err(e) = self.write(token) {
            tracing::warn!("Failed to save token to {}: {}", self.path.display(), e);
        }
    }

    fn get_token(&self) -> Option<String> {
        self.read().map(|stored| stored.token)
    }

    fn remove_token(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove token file {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.get_token().is_none());
        store.save_token("abc");
        assert_eq!(store.get_token().as_deref(), Some("abc"));
        store.remove_token();
        assert!(store.get_token().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("token.json");

        FileTokenStore::new(&path).save_token("tok-1");
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get_token().as_deref(), Some("tok-1"));
        assert!(reopened.saved_at().is_some());

        reopened.remove_token();
        assert!(reopened.get_token().is_none());
        // 重複刪除不報錯
        reopened.remove_token();
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, b"not json").unwrap();

        assert!(FileTokenStore::new(&path).get_token().is_none());
    }
}
