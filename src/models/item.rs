//! Item data structure.

use serde::{Deserialize, Serialize};

/// A single release picked by a source.
///
/// `link` is the item's identity: checkpoints store the link of the newest
/// item seen, and scans stop on the first link equal to that marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Artist name(s)
    pub artist: String,

    /// Album or track title
    pub title: String,

    /// Canonical URL of the review, video or track
    pub link: String,
}

impl Item {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            link: link.into(),
        }
    }
}

/// What a source lists, used to route items to the matching playlist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Albums,
    Tracks,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Albums => "albums",
            ItemKind::Tracks => "tracks",
        }
    }

    /// Capitalised label used in playlist names.
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Albums => "Albums",
            ItemKind::Tracks => "Tracks",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_round_trips_through_json() {
        let item = Item::new("Run the Jewels", "RTJ4", "https://example.com/rtj4");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(serde_json::from_str::<Item>(&json).unwrap(), item);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ItemKind::Tracks).unwrap();
        assert_eq!(json, "\"tracks\"");
        assert_eq!(ItemKind::Albums.label(), "Albums");
    }
}
