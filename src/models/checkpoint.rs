//! Persisted checkpoint row.

use serde::{Deserialize, Serialize};

/// Last-seen marker for one source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    /// Source name, unique
    pub name: String,

    /// Link of the newest item reported for the source
    pub marker: String,
}

impl Checkpoint {
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
        }
    }
}
