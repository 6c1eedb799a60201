//! Checkpoint persistence.
//!
//! A checkpoint is the only state that survives between runs: one row per
//! source name holding the link of the newest item already reported.
//!
//! ## Layout
//!
//! ```text
//! storage/
//! ├── config.toml        # Optional configuration
//! └── checkpoints.json   # [{ "name": ..., "marker": ... }, ...]
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Checkpoint;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Trait for checkpoint storage backends.
///
/// Writes are last-write-wins per name; no history is kept. Errors are
/// returned to the caller and end the run.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Marker stored for `name`, or the empty string if there is none.
    async fn get(&self, name: &str) -> Result<String>;

    /// Insert or replace the marker for `name`.
    async fn set(&self, name: &str, marker: &str) -> Result<()>;

    /// Every stored row, ordered by name.
    async fn all(&self) -> Result<Vec<Checkpoint>>;
}
