//! JSON snapshot implementation of the store repository.
//!
//! The whole store state is serialized to one JSON document and replaced on
//! every save. A missing, unreadable, or unmigratable snapshot loads as an
//! empty store: persistence problems must never take the assistant down.

use crate::paths::OpsdeskPaths;
use crate::snapshot::{decode_snapshot, encode_snapshot};
use crate::storage::AtomicJsonFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use opsdesk_core::session::{StoreRepository, StoreState};
use serde_json::Value;
use std::path::PathBuf;

/// Store repository backed by a single atomic JSON snapshot file.
pub struct JsonStoreRepository {
    file: AtomicJsonFile<Value>,
}

impl JsonStoreRepository {
    /// Creates a repository over the given snapshot file path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Creates a repository at the default location
    /// (`~/.config/opsdesk/chat_store.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        let path = OpsdeskPaths::store_file()
            .map_err(|e| anyhow::anyhow!("Failed to resolve store path: {}", e))?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl StoreRepository for JsonStoreRepository {
    async fn load(&self) -> Result<StoreState> {
        let file = self.file.clone();
        let raw = tokio::task::spawn_blocking(move || file.load())
            .await
            .context("Failed to join storage task")?;

        let value = match raw {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(StoreState::default()),
            Err(e) => {
                tracing::warn!(
                    "[JsonStoreRepository] Unreadable snapshot, starting with an empty store: {}",
                    e
                );
                return Ok(StoreState::default());
            }
        };

        match decode_snapshot(value) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(
                    "[JsonStoreRepository] Unmigratable snapshot, starting with an empty store: {}",
                    e
                );
                Ok(StoreState::default())
            }
        }
    }

    async fn save(&self, state: &StoreState) -> Result<()> {
        let value = encode_snapshot(state).context("Failed to encode snapshot")?;

        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.save(&value))
            .await
            .context("Failed to join storage task")?
            .context("Failed to write snapshot")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::config::ChatConfig;
    use opsdesk_core::session::{ConversationMessage, SessionStore};
    use tempfile::TempDir;

    fn repository(dir: &TempDir) -> JsonStoreRepository {
        JsonStoreRepository::new(dir.path().join("chat_store.json"))
    }

    #[tokio::test]
    async fn test_load_without_snapshot_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let state = repository(&temp_dir).load().await.unwrap();

        assert!(state.sessions.is_empty());
        assert!(state.active_session_id.is_none());
    }

    #[tokio::test]
    async fn test_save_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        let mut store = SessionStore::new(ChatConfig::default());
        let id = store.create_session().id.clone();
        store.append_messages(
            &id,
            vec![
                ConversationMessage::user("Prepare a pitch for Acme Corp"),
                ConversationMessage::assistant("On it."),
            ],
        );
        store.create_session();

        repo.save(store.state()).await.unwrap();
        let reloaded = repo.load().await.unwrap();

        assert_eq!(&reloaded, store.state());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        let mut store = SessionStore::new(ChatConfig::default());
        let id = store.create_session().id.clone();
        repo.save(store.state()).await.unwrap();

        store.delete_session(&id);
        repo.save(store.state()).await.unwrap();

        let reloaded = repo.load().await.unwrap();
        assert!(reloaded.sessions.is_empty());
        assert!(reloaded.active_session_id.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat_store.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let state = JsonStoreRepository::new(path).load().await.unwrap();
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_schema_version_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat_store.json");
        std::fs::write(
            &path,
            r#"{"schemaVersion": 99, "sessions": [], "activeSessionId": null}"#,
        )
        .unwrap();

        let state = JsonStoreRepository::new(path).load().await.unwrap();
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_snapshot_is_migrated_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat_store.json");
        std::fs::write(
            &path,
            r#"{
                "sessions": [{
                    "id": "legacy-1",
                    "title": "Old chat",
                    "messages": [],
                    "createdAt": "2023-06-01T10:00:00Z",
                    "updatedAt": "2023-06-01T10:00:00Z"
                }],
                "activeSessionId": "legacy-1"
            }"#,
        )
        .unwrap();

        let repo = JsonStoreRepository::new(path.clone());
        let state = repo.load().await.unwrap();
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.active_session_id.as_deref(), Some("legacy-1"));

        // Saving writes the snapshot back under the current schema version.
        repo.save(&state).await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["schemaVersion"], 2);
    }
}
