use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TokenStore;

/// Token file name in the data directory
pub const TOKEN_FILE: &str = "token.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    stored_at: DateTime<Utc>,
}

/// Access token kept in a JSON file, for machines without a usable keychain.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store the token as `token.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TOKEN_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).context("Failed to read token file")?;
        let stored = serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(stored))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read()?.map(|s| s.token))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create token directory")?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, contents).context("Failed to write token file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    fn stored_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.map(|s| s.stored_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(&dir.path().join("nested"));

        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.stored_at().unwrap(), None);

        store.save("tok1").unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap().as_deref(), Some("tok1"));
        assert!(store.stored_at().unwrap().is_some());

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileTokenStore::in_dir(dir.path()).save("tok1").unwrap();

        let reopened = FileTokenStore::in_dir(dir.path());
        assert_eq!(reopened.load().unwrap().as_deref(), Some("tok1"));
    }

    #[test]
    fn test_stored_at_visible_through_trait_object() {
        let dir = tempfile::tempdir().unwrap();
        let before = Utc::now();
        let store: Box<dyn TokenStore> = Box::new(FileTokenStore::in_dir(dir.path()));
        store.save("tok1").unwrap();

        let stored_at = store.stored_at().unwrap().expect("timestamp recorded");
        assert!(stored_at >= before);
    }

    #[test]
    fn test_corrupt_token_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        assert!(store.load().is_err());
    }
}
