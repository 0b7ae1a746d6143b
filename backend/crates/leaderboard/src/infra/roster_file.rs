//! JSON Roster Store
//!
//! File-backed `RosterRepository`. Writes go through a temp file and a
//! rename so a crash mid-write never leaves a truncated roster, and all
//! file access is serialized behind an async lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::entities::PlayerRecord;
use crate::domain::repository::RosterRepository;
use crate::error::{LeaderboardError, LeaderboardResult};

/// Roster repository backed by a single JSON file
#[derive(Clone)]
pub struct JsonRosterStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl JsonRosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterRepository for JsonRosterStore {
    async fn load(&self) -> LeaderboardResult<Vec<PlayerRecord>> {
        let _guard = self.lock.lock().await;
        let bytes = tokio::fs::read(&*self.path)
            .await
            .map_err(|e| LeaderboardError::RosterUnavailable(e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LeaderboardError::RosterMalformed(e.to_string()))
    }

    async fn replace(&self, players: Vec<PlayerRecord>) -> LeaderboardResult<usize> {
        let _guard = self.lock.lock().await;
        let json = serde_json::to_vec_pretty(&players)
            .map_err(|e| LeaderboardError::Internal(e.to_string()))?;

        // Atomic swap: write next to the target, then rename over it
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| LeaderboardError::Internal(format!("roster write failed: {e}")))?;
        tokio::fs::rename(&tmp, &*self.path)
            .await
            .map_err(|e| LeaderboardError::Internal(format!("roster rename failed: {e}")))?;

        tracing::debug!(count = players.len(), path = %self.path.display(), "roster saved");
        Ok(players.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::handle::Handle;

    fn record(name: &str) -> PlayerRecord {
        PlayerRecord::new(Handle::new(name).unwrap())
    }

    #[tokio::test]
    async fn test_replace_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRosterStore::new(dir.path().join("players.json"));

        let count = store
            .replace(vec![record("alice"), record("bob")])
            .await
            .unwrap();
        assert_eq!(count, 2);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRosterStore::new(dir.path().join("absent.json"));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, LeaderboardError::RosterUnavailable(_)));
    }

    #[tokio::test]
    async fn test_garbage_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        tokio::fs::write(&path, b"not json at all").await.unwrap();
        let store = JsonRosterStore::new(path);

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, LeaderboardError::RosterMalformed(_)));
    }

    #[tokio::test]
    async fn test_replace_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        let store = JsonRosterStore::new(path.clone());

        store.replace(vec![record("alice")]).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
