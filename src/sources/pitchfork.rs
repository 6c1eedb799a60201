//! Pitchfork "Best New" albums and tracks.
//!
//! Both pages are plain HTML listings, newest first. Album reviews are
//! `div.review` cards; the tracks page leads with a featured hero track
//! followed by the regular track list.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Item, ItemKind};
use crate::sources::{Listing, Source, parse_selector};
use crate::utils::http::fetch_text;
use crate::utils::{normalize_whitespace, resolve_url, strip_quotes};

const BASE_URL: &str = "https://www.pitchfork.com";
const ALBUMS_URL: &str = "https://www.pitchfork.com/reviews/best/albums/";
const TRACKS_URL: &str = "https://www.pitchfork.com/reviews/best/tracks/";

const ALBUM_CARD: &str = "div.review";
const TRACK_CARD: &str = "div.track-hero, div.track-collection-item";
const ARTISTS: &str = "ul li";
const TITLE: &str = "h2";
const LINK: &str = "a[href]";

/// Pitchfork Best New Albums.
pub struct PitchforkAlbums {
    client: reqwest::Client,
}

impl PitchforkAlbums {
    pub const NAME: &'static str = "Pitchfork Albums";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Source for PitchforkAlbums {
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
        let html = fetch_text(&self.client, ALBUMS_URL).await?;
        Ok(Listing::Items(parse_albums(&html)?))
    }
}

/// Pitchfork Best New Tracks.
pub struct PitchforkTracks {
    client: reqwest::Client,
}

impl PitchforkTracks {
    pub const NAME: &'static str = "Pitchfork Tracks";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Source for PitchforkTracks {
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
        let html = fetch_text(&self.client, TRACKS_URL).await?;
        Ok(Listing::Items(parse_tracks(&html)?))
    }
}

/// Parse album review cards.
pub fn parse_albums(html: &str) -> Result<Vec<Item>> {
    parse_cards(html, PitchforkAlbums::NAME, ALBUM_CARD, false)
}

/// Parse the hero track and the track list, in page order.
pub fn parse_tracks(html: &str) -> Result<Vec<Item>> {
    parse_cards(html, PitchforkTracks::NAME, TRACK_CARD, true)
}

/// Every card must yield an item. A card missing its link or title fails
/// the whole page, since dropping it could hide the checkpoint marker.
fn parse_cards(
    html: &str,
    source_name: &str,
    card_selector: &str,
    quoted_titles: bool,
) -> Result<Vec<Item>> {
    let document = Html::parse_document(html);
    let base = Url::parse(BASE_URL)?;

    let selectors = CardSelectors {
        artist: parse_selector(ARTISTS)?,
        title: parse_selector(TITLE)?,
        link: parse_selector(LINK)?,
    };
    let card_sel = parse_selector(card_selector)?;

    document
        .select(&card_sel)
        .enumerate()
        .map(|(index, card)| {
            parse_card(&card, &selectors, &base, quoted_titles).ok_or_else(|| {
                AppError::scrape(
                    source_name,
                    format!("card {} has no link or no title", index + 1),
                )
            })
        })
        .collect()
}

struct CardSelectors {
    artist: Selector,
    title: Selector,
    link: Selector,
}

fn parse_card(
    card: &ElementRef,
    selectors: &CardSelectors,
    base: &Url,
    quoted_titles: bool,
) -> Option<Item> {
    let href = card.select(&selectors.link).next()?.value().attr("href")?;
    let link = resolve_url(base, href);

    let artist = card
        .select(&selectors.artist)
        .map(|li| normalize_whitespace(&li.text().collect::<String>()))
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");

    let raw_title =
        normalize_whitespace(&card.select(&selectors.title).next()?.text().collect::<String>());
    let title = if quoted_titles {
        strip_quotes(&raw_title)
    } else {
        raw_title
    };

    if title.is_empty() {
        return None;
    }

    Some(Item {
        artist,
        title,
        link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALBUMS_HTML: &str = r#"
        <html><body>
          <div class="fragment-list">
            <div class="review">
              <a href="/reviews/albums/run-the-jewels-rtj4/" class="review__link">
                <div class="review__title">
                  <ul class="artist-list review__title-artist"><li>Run the Jewels</li></ul>
                  <h2 class="review__title-album">RTJ4</h2>
                </div>
              </a>
            </div>
            <div class="review">
              <a href="/reviews/albums/moses-sumney-grae/" class="review__link">
                <div class="review__title">
                  <ul class="artist-list review__title-artist">
                    <li>Moses Sumney</li>
                    <li>Guest Artist</li>
                  </ul>
                  <h2 class="review__title-album">græ</h2>
                </div>
              </a>
            </div>
          </div>
        </body></html>
    "#;

    const TRACKS_HTML: &str = r#"
        <html><body>
          <div class="track-hero">
            <a href="/reviews/tracks/hero-track/" class="title-link">
              <ul class="artist-list"><li>Perfume Genius</li></ul>
              <h2 class="title">“On the Floor”</h2>
            </a>
          </div>
          <div class="track-collection-list">
            <div class="track-collection-item">
              <a href="/reviews/tracks/second-track/" class="track-collection-item__track-link">
                <ul class="artist-list"><li>Fiona Apple</li></ul>
                <h2 class="track-collection-item__title">“Shameika”</h2>
              </a>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_albums() {
        let items = parse_albums(ALBUMS_HTML).unwrap();
        assert_eq!(
            items,
            vec![
                Item::new(
                    "Run the Jewels",
                    "RTJ4",
                    "https://www.pitchfork.com/reviews/albums/run-the-jewels-rtj4/"
                ),
                Item::new(
                    "Moses Sumney / Guest Artist",
                    "græ",
                    "https://www.pitchfork.com/reviews/albums/moses-sumney-grae/"
                ),
            ]
        );
    }

    #[test]
    fn test_parse_tracks_hero_first_and_unquoted() {
        let items = parse_tracks(TRACKS_HTML).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "On the Floor");
        assert_eq!(items[0].artist, "Perfume Genius");
        assert_eq!(
            items[0].link,
            "https://www.pitchfork.com/reviews/tracks/hero-track/"
        );
        assert_eq!(items[1].title, "Shameika");
    }

    #[test]
    fn test_card_without_title_fails_the_page() {
        let html = r#"
            <div class="review"><a href="/reviews/albums/new/"><h2>New</h2></a></div>
            <div class="review"><a href="/reviews/albums/marker/"><span>Marker</span></a></div>
            <div class="review"><a href="/reviews/albums/old/"><h2>Old</h2></a></div>
        "#;

        let err = parse_albums(html).unwrap_err();
        assert!(matches!(
            err,
            AppError::Scrape { ref source_name, .. } if source_name == "Pitchfork Albums"
        ));
    }

    #[test]
    fn test_card_without_link_fails_the_page() {
        let html = r#"<div class="track-hero"><h2>“No link”</h2></div>"#;
        assert!(parse_tracks(html).is_err());
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_albums("<html></html>").unwrap().is_empty());
    }
}
