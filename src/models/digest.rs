//! Digest entry and whole-run digest structures.

use serde::{Deserialize, Serialize};

use super::{Item, ItemKind};

/// Result of scraping one source during a run.
///
/// Invariant: `errors == true` implies `items` is empty. Use the
/// constructors; a failed fetch never yields partial items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigestEntry {
    /// Source display name (also its checkpoint key)
    pub title: String,

    /// Canonical link of the listing page itself
    pub link: String,

    /// Albums or tracks
    pub kind: ItemKind,

    /// New items, newest first
    pub items: Vec<Item>,

    /// Whether the fetch failed
    pub errors: bool,
}

impl DigestEntry {
    /// Entry for a successful scrape.
    pub fn found(
        title: impl Into<String>,
        link: impl Into<String>,
        kind: ItemKind,
        items: Vec<Item>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            kind,
            items,
            errors: false,
        }
    }

    /// Entry for a failed scrape. Always empty.
    pub fn failed(title: impl Into<String>, link: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            kind,
            items: Vec::new(),
            errors: true,
        }
    }

    /// Whether this entry is worth telling someone about.
    pub fn is_noteworthy(&self) -> bool {
        !self.items.is_empty() || self.errors
    }
}

/// All entries of one run, in configured source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Digest {
    pub entries: Vec<DigestEntry>,
}

impl Digest {
    pub fn new(entries: Vec<DigestEntry>) -> Self {
        Self { entries }
    }

    /// Total number of new items across all entries.
    pub fn item_count(&self) -> usize {
        self.entries.iter().map(|e| e.items.len()).sum()
    }

    /// Number of entries whose fetch failed.
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.errors).count()
    }

    pub fn has_items(&self) -> bool {
        self.entries.iter().any(|e| !e.items.is_empty())
    }

    /// Items of the given kind across all entries, in digest order.
    pub fn items_of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.entries
            .iter()
            .filter(move |e| e.kind == kind)
            .flat_map(|e| e.items.iter())
    }
}
