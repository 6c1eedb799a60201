//! Source adapters.
//!
//! Each source knows how to fetch one upstream listing and turn it into
//! candidate items, newest first. Deciding which candidates are new and
//! advancing the checkpoint is done once for all sources by
//! [`crate::pipeline::scrape`].
//!
//! | Source | Module | Upstream |
//! |--------|--------|----------|
//! | Pitchfork Albums | [`pitchfork`] | HTML |
//! | Pitchfork Tracks | [`pitchfork`] | HTML |
//! | Sputnikmusic Albums | [`sputnikmusic`] | HTML |
//! | The Needle Drop Albums | [`needle_drop`] | YouTube playlist, title filtered |
//! | The Needle Drop Tracks | [`needle_drop`] | YouTube playlist, latest installment |

pub mod needle_drop;
pub mod pitchfork;
pub mod sputnikmusic;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use scraper::Selector;

use crate::error::{AppError, Result};
use crate::models::{Config, Item, ItemKind};
use crate::services::YoutubeClient;

pub use needle_drop::{NeedleDropAlbums, NeedleDropTracks};
pub use pitchfork::{PitchforkAlbums, PitchforkTracks};
pub use sputnikmusic::SputnikmusicAlbums;

/// What a single fetch produced.
///
/// Precondition for every source: candidates are ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Candidates scanned with stop-on-match against the checkpoint.
    Items(Vec<Item>),

    /// A single latest installment identified by `link`, plus its companion
    /// items. The installment link is compared to the checkpoint first;
    /// companions are then scanned against the same marker.
    Installment { link: String, items: Vec<Item> },
}

impl Listing {
    pub fn empty() -> Self {
        Listing::Items(Vec::new())
    }
}

/// One upstream listing.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable name; used as checkpoint key and digest entry title.
    fn name(&self) -> &str;

    /// Canonical link of the listing itself.
    fn link(&self) -> &str;

    /// Albums or tracks.
    fn kind(&self) -> ItemKind;

    /// Perform the source's request(s) and parse candidates.
    async fn fetch(&self) -> Result<Listing>;
}

/// Build every enabled source in configured order.
pub fn build_sources(config: &Config, client: &reqwest::Client) -> Result<Vec<Box<dyn Source>>> {
    let flags = &config.sources;
    let mut sources: Vec<Box<dyn Source>> = Vec::new();

    if flags.pitchfork_albums {
        sources.push(Box::new(PitchforkAlbums::new(client.clone())));
    }
    if flags.pitchfork_tracks {
        sources.push(Box::new(PitchforkTracks::new(client.clone())));
    }
    if flags.sputnikmusic_albums {
        sources.push(Box::new(SputnikmusicAlbums::new(client.clone())));
    }
    if config.needs_youtube() {
        let api_key = config
            .youtube
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config("Missing mandatory settings: [YOUTUBE_API_KEY]"))?;
        let youtube = YoutubeClient::new(client.clone(), api_key);

        if flags.the_needle_drop_albums {
            sources.push(Box::new(NeedleDropAlbums::new(youtube.clone())));
        }
        if flags.the_needle_drop_tracks {
            sources.push(Box::new(NeedleDropTracks::new(youtube)));
        }
    }

    Ok(sources)
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
