//! In-memory checkpoint storage.
//!
//! Used for dry runs, seeded from a snapshot of the real store so scraping
//! behaves the same but nothing is persisted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::Checkpoint;
use crate::storage::CheckpointStore;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    rows: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing rows.
    pub fn with_rows(rows: impl IntoIterator<Item = Checkpoint>) -> Self {
        Self {
            rows: RwLock::new(rows.into_iter().map(|c| (c.name, c.marker)).collect()),
        }
    }

    /// Copy every row out of another store.
    pub async fn snapshot_of(store: &dyn CheckpointStore) -> Result<Self> {
        Ok(Self::with_rows(store.all().await?))
    }
}

#[async_trait]
impl CheckpointStore for MemoryStorage {
    async fn get(&self, name: &str) -> Result<String> {
        Ok(self.rows.read().await.get(name).cloned().unwrap_or_default())
    }

    async fn set(&self, name: &str, marker: &str) -> Result<()> {
        self.rows
            .write()
            .await
            .insert(name.to_string(), marker.to_string());
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Checkpoint>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .map(|(name, marker)| Checkpoint::new(name.clone(), marker.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_and_set() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("x").await.unwrap(), "");

        storage.set("x", "L1").await.unwrap();
        storage.set("x", "L2").await.unwrap();
        assert_eq!(storage.get("x").await.unwrap(), "L2");
        assert_eq!(storage.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_does_not_write_back() {
        let original = MemoryStorage::with_rows([Checkpoint::new("x", "L1")]);
        let snapshot = MemoryStorage::snapshot_of(&original).await.unwrap();

        snapshot.set("x", "L9").await.unwrap();

        assert_eq!(original.get("x").await.unwrap(), "L1");
        assert_eq!(snapshot.get("x").await.unwrap(), "L9");
    }
}
