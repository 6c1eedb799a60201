//! Local filesystem checkpoint storage.
//!
//! All rows live in a single `checkpoints.json` under the root directory.
//! Writes go to a temp file that is then renamed over the original, so a
//! crash mid-write leaves the previous rows intact.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::Checkpoint;
use crate::storage::CheckpointStore;

const CHECKPOINTS_KEY: &str = "checkpoints.json";

/// Local filesystem storage backend.
pub struct LocalStorage {
    root_dir: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn load_rows(&self) -> Result<Vec<Checkpoint>> {
        match self.read_bytes(CHECKPOINTS_KEY).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::storage(format!(
                    "{} is corrupt: {}",
                    self.path(CHECKPOINTS_KEY).display(),
                    e
                ))
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn save_rows(&self, rows: &[Checkpoint]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(rows)?;
        self.write_bytes(CHECKPOINTS_KEY, &bytes).await
    }
}

#[async_trait]
impl CheckpointStore for LocalStorage {
    async fn get(&self, name: &str) -> Result<String> {
        let rows = self.load_rows().await?;
        Ok(rows
            .into_iter()
            .find(|row| row.name == name)
            .map(|row| row.marker)
            .unwrap_or_default())
    }

    async fn set(&self, name: &str, marker: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.load_rows().await?;
        match rows.iter_mut().find(|row| row.name == name) {
            Some(row) if row.marker == marker => return Ok(()),
            Some(row) => row.marker = marker.to_string(),
            None => rows.push(Checkpoint::new(name, marker)),
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        self.save_rows(&rows).await
    }

    async fn all(&self) -> Result<Vec<Checkpoint>> {
        let mut rows = self.load_rows().await?;
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert_eq!(storage.get("Pitchfork Albums").await.unwrap(), "");
        assert!(storage.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.set("checkpoint-1", "some-link").await.unwrap();
        assert_eq!(storage.get("checkpoint-1").await.unwrap(), "some-link");
        assert_eq!(storage.get("checkpoint-2").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_set_replaces_single_row() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.set("b", "old").await.unwrap();
        storage.set("a", "first").await.unwrap();
        storage.set("b", "new").await.unwrap();
        storage.set("b", "new").await.unwrap();

        let rows = storage.all().await.unwrap();
        assert_eq!(
            rows,
            vec![Checkpoint::new("a", "first"), Checkpoint::new("b", "new")]
        );
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        LocalStorage::new(tmp.path())
            .set("Sputnikmusic Albums", "L1")
            .await
            .unwrap();

        let reopened = LocalStorage::new(tmp.path());
        assert_eq!(reopened.get("Sputnikmusic Albums").await.unwrap(), "L1");
        assert!(!tmp.path().join("checkpoints.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CHECKPOINTS_KEY), b"not json").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let err = storage.get("anything").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
