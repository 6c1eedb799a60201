//! The Needle Drop album reviews and weekly track roundups.
//!
//! Both read a YouTube playlist. The album playlist mixes reviews with
//! other videos, so only titles shaped like `Artist - Title ALBUM REVIEW`
//! are candidates. The track playlist is read as a single latest
//! installment: the newest "Weekly Track Roundup" video, whose description
//! lists the week's best tracks.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;
use crate::models::{Item, ItemKind};
use crate::services::youtube::{PlaylistVideo, YoutubeClient};
use crate::sources::{Listing, Source};
use crate::utils::normalize_whitespace;

const ALBUMS_PLAYLIST: &str = "PLP4CSgl7K7oo93I49tQa0TLB8qY3u7xuO";
const TRACKS_PLAYLIST: &str = "PLP4CSgl7K7or84AAhr7zlLNpghEnKWu2c";
const ALBUMS_URL: &str =
    "https://www.youtube.com/playlist?list=PLP4CSgl7K7oo93I49tQa0TLB8qY3u7xuO";
const TRACKS_URL: &str =
    "https://www.youtube.com/playlist?list=PLP4CSgl7K7or84AAhr7zlLNpghEnKWu2c";

static REVIEW_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<artist>.+?)\s+-\s+(?P<title>.+?)\s+(?:ALBUM|EP|MIXTAPE)\s+REVIEW\s*$")
        .expect("review title pattern is valid")
});

/// Section headings in roundup descriptions look like `!!!BEST TRACKS THIS WEEK!!!`.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[!.]{3}.*[!.]{3}$").expect("heading pattern is valid")
});

const ROUNDUP_MARKER: &str = "weekly track roundup";
const BEST_SECTION_MARKER: &str = "best tracks";

/// The Needle Drop album reviews.
pub struct NeedleDropAlbums {
    youtube: YoutubeClient,
}

impl NeedleDropAlbums {
    pub const NAME: &'static str = "The Needle Drop Albums";

    pub fn new(youtube: YoutubeClient) -> Self {
        Self { youtube }
    }
}

#[async_trait]
impl Source for NeedleDropAlbums {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn link(&self) -> &str {
        ALBUMS_URL
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Albums
    }

    async fn fetch(&self) -> Result<Listing> {
        let videos = self.youtube.playlist_videos(ALBUMS_PLAYLIST).await?;
        Ok(Listing::Items(parse_reviews(&videos)))
    }
}

/// The Needle Drop weekly track roundups.
pub struct NeedleDropTracks {
    youtube: YoutubeClient,
}

impl NeedleDropTracks {
    pub const NAME: &'static str = "The Needle Drop Tracks";

    pub fn new(youtube: YoutubeClient) -> Self {
        Self { youtube }
    }
}

#[async_trait]
impl Source for NeedleDropTracks {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn link(&self) -> &str {
        TRACKS_URL
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Tracks
    }

    async fn fetch(&self) -> Result<Listing> {
        let videos = self.youtube.playlist_videos(TRACKS_PLAYLIST).await?;
        Ok(parse_roundup(&videos))
    }
}

/// Keep only album/EP/mixtape review videos, in playlist order.
pub fn parse_reviews(videos: &[PlaylistVideo]) -> Vec<Item> {
    videos
        .iter()
        .filter_map(|video| {
            let caps = REVIEW_TITLE.captures(video.title.trim())?;
            Some(Item {
                artist: caps["artist"].trim().to_string(),
                title: caps["title"].trim().to_string(),
                link: video.link.clone(),
            })
        })
        .collect()
}

/// The newest roundup and the best tracks listed in its description.
pub fn parse_roundup(videos: &[PlaylistVideo]) -> Listing {
    let Some(roundup) = videos
        .iter()
        .find(|v| v.title.to_lowercase().contains(ROUNDUP_MARKER))
    else {
        return Listing::empty();
    };

    Listing::Installment {
        link: roundup.link.clone(),
        items: parse_best_tracks(&roundup.description, &roundup.link),
    }
}

/// Tracks from the best-tracks section of a roundup description.
///
/// Each track is an `Artist - Title` line, optionally followed by a URL
/// line. Tracks without a URL point at the roundup itself.
fn parse_best_tracks(description: &str, fallback_link: &str) -> Vec<Item> {
    let lines: Vec<&str> = description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some(start) = lines.iter().position(|l| {
        HEADING.is_match(l) && l.to_lowercase().contains(BEST_SECTION_MARKER)
    }) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut iter = lines[start + 1..].iter().peekable();

    while let Some(line) = iter.next() {
        if HEADING.is_match(line) {
            break;
        }
        if is_url(line) {
            continue;
        }
        let Some((artist, title)) = line.split_once(" - ") else {
            continue;
        };

        let link = iter
            .next_if(|next| is_url(next))
            .map_or_else(|| fallback_link.to_string(), |url| url.to_string());

        items.push(Item {
            artist: normalize_whitespace(artist),
            title: normalize_whitespace(title),
            link,
        });
    }

    items
}

fn is_url(line: &str) -> bool {
    line.starts_with("http://") || line.starts_with("https://")
}
