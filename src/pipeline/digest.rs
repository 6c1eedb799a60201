//! Digest assembly and the notification gate.

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::Result;
use crate::models::Digest;
use crate::pipeline::scrape;
use crate::sources::Source;
use crate::storage::CheckpointStore;

/// Scrape every source and collect entries in the given order.
///
/// Up to `max_concurrent` sources are fetched at once; entries still come
/// back in source order. A failing source yields a failed entry and does
/// not stop the others.
pub async fn assemble(
    sources: &[Box<dyn Source>],
    store: &dyn CheckpointStore,
    max_concurrent: usize,
) -> Result<Digest> {
    let entries = stream::iter(sources)
        .map(|source| scrape(source.as_ref(), store))
        .buffered(max_concurrent.max(1))
        .try_collect::<Vec<_>>()
        .await?;

    let digest = Digest::new(entries);
    log::info!(
        "Digest assembled: {} sources, {} new items, {} failures",
        digest.entries.len(),
        digest.item_count(),
        digest.failure_count()
    );
    Ok(digest)
}

/// Whether the digest warrants any outward side effect.
pub fn should_notify(digest: &Digest, always_notify: bool) -> bool {
    always_notify || digest.entries.iter().any(|e| e.is_noteworthy())
}
