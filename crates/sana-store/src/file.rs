//! File-backed key-value store.
//!
//! One file per key under a data directory; values are written
//! verbatim. Keys are restricted to a filename-safe alphabet.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Extension used for value files.
const VALUE_EXT: &str = "json";

/// [`KeyValueStore`] that keeps each value in its own file.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{VALUE_EXT}")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(key) = name.strip_suffix(&format!(".{VALUE_EXT}")) {
                keys.push(key.to_string());
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        assert_eq!(store.get("conversation_chat_1").await.unwrap(), None);

        store.set("conversation_chat_1", r#"[{"id":1}]"#).await.unwrap();
        assert_eq!(
            store.get("conversation_chat_1").await.unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );

        store.remove("conversation_chat_1").await.unwrap();
        assert_eq!(store.get("conversation_chat_1").await.unwrap(), None);

        // Removing a missing key is not an error.
        store.remove("conversation_chat_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_lists_stored_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.set("current_conversation", "chat_1").await.unwrap();
        store.set("conversation_chat_1", "[]").await.unwrap();

        let mut keys = store.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["conversation_chat_1", "current_conversation"]);
    }

    #[tokio::test]
    async fn test_rejects_unsafe_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        for key in ["", "../escape", "a/b", "a b"] {
            assert!(matches!(
                store.get(key).await,
                Err(StoreError::InvalidKey(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).await.unwrap();
            store.set("current_conversation", "chat_42").await.unwrap();
        }
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(
            store.get("current_conversation").await.unwrap().as_deref(),
            Some("chat_42")
        );
    }
}
