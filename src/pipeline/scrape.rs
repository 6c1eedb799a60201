//! Checkpointed scraping of a single source.

use crate::error::Result;
use crate::models::{DigestEntry, Item};
use crate::sources::{Listing, Source};
use crate::storage::CheckpointStore;

/// Scrape one source and advance its checkpoint.
///
/// Fetch errors are contained: they are logged and produce a failed entry
/// with no items, leaving the checkpoint untouched. Checkpoint store errors
/// are returned.
pub async fn scrape(source: &dyn Source, store: &dyn CheckpointStore) -> Result<DigestEntry> {
    let name = source.name();

    let listing = match source.fetch().await {
        Ok(listing) => listing,
        Err(e) => {
            log::error!("Failed to scrape {}: {}", name, e);
            return Ok(DigestEntry::failed(name, source.link(), source.kind()));
        }
    };

    let marker = store.get(name).await?;

    let items = match listing {
        Listing::Items(candidates) => {
            let new_items = take_new(candidates, &marker);
            if let Some(head) = new_items.first() {
                advance(store, name, &head.link).await?;
            }
            new_items
        }
        Listing::Installment { link, items } => {
            if link == marker {
                Vec::new()
            } else {
                advance(store, name, &link).await?;
                take_new(items, &marker)
            }
        }
    };

    log::info!("{} ({}): {} new", name, source.kind().as_str(), items.len());
    Ok(DigestEntry::found(name, source.link(), source.kind(), items))
}

async fn advance(store: &dyn CheckpointStore, name: &str, marker: &str) -> Result<()> {
    store.set(name, marker).await?;
    log::info!("{}: checkpoint advanced to {}", name, marker);
    Ok(())
}

/// Candidates before the first one whose link equals `marker`.
pub fn take_new(candidates: Vec<Item>, marker: &str) -> Vec<Item> {
    candidates
        .into_iter()
        .take_while(|item| item.link != marker)
        .collect()
}
