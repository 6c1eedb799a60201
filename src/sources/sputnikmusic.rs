//! Sputnikmusic best new music.
//!
//! Each album sits in a `td.bestnewmusic` cell whose anchor wraps the cover,
//! the artist in bold, and the album title as trailing text.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Item, ItemKind};
use crate::sources::{Listing, Source, parse_selector};
use crate::utils::http::fetch_text;
use crate::utils::{normalize_whitespace, resolve_url};

const BASE_URL: &str = "https://www.sputnikmusic.com";
const SCRAPE_URL: &str = "https://www.sputnikmusic.com/bestnewmusic";

const CELL: &str = "td.bestnewmusic";
const LINK: &str = "a[href]";
const ARTIST: &str = "b";

/// Sputnikmusic Best New Music albums.
pub struct SputnikmusicAlbums {
    client: reqwest::Client,
}

impl SputnikmusicAlbums {
    pub const NAME: &'static str = "Sputnikmusic Albums";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Source for SputnikmusicAlbums {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn link(&self) -> &str {
        SCRAPE_URL
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Albums
    }

    async fn fetch(&self) -> Result<Listing> {
        let html = fetch_text(&self.client, SCRAPE_URL).await?;
        Ok(Listing::Items(parse_albums(&html)?))
    }
}

/// Parse album cells in page order. Repeated links keep their first position.
///
/// Cells without an anchor are layout filler and are skipped. A cell whose
/// anchor lacks an href, artist or title fails the page.
pub fn parse_albums(html: &str) -> Result<Vec<Item>> {
    let document = Html::parse_document(html);
    let base = Url::parse(BASE_URL)?;

    let cell_sel = parse_selector(CELL)?;
    let link_sel = parse_selector(LINK)?;
    let artist_sel = parse_selector(ARTIST)?;

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for (index, cell) in document.select(&cell_sel).enumerate() {
        let Some(anchor) = cell.select(&link_sel).next() else {
            continue;
        };
        let malformed = |what: &str| {
            AppError::scrape(
                SputnikmusicAlbums::NAME,
                format!("cell {} has no {}", index + 1, what),
            )
        };

        let href = anchor.value().attr("href").ok_or_else(|| malformed("href"))?;
        let link = resolve_url(&base, href);

        let artist = anchor
            .select(&artist_sel)
            .next()
            .map(|b| normalize_whitespace(&b.text().collect::<String>()))
            .unwrap_or_default();
        if artist.is_empty() {
            return Err(malformed("artist"));
        }
        let title = direct_text(&anchor);
        if title.is_empty() {
            return Err(malformed("title"));
        }

        if seen.insert(link.clone()) {
            items.push(Item {
                artist,
                title,
                link,
            });
        }
    }

    Ok(items)
}

/// Text nodes that are immediate children of `element`.
fn direct_text(element: &ElementRef) -> String {
    let parts: Vec<&str> = element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect();
    normalize_whitespace(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body><table class="bnm"><tr>
          <td class="bestnewmusic">
            <a href="/album/356763/Run-the-Jewels-Run-the-Jewels-4/">
              <img src="/images/albums/356763.jpg"><br>
              <b>Run the Jewels</b><br>
              Run the Jewels 4
            </a>
          </td>
          <td class="bestnewmusic">
            <a href="/album/357694/Jeff-Rosenstock-NO-DREAM/">
              <img src="/images/albums/357694.jpg"><br>
              <b>Jeff Rosenstock</b><br>NO DREAM
            </a>
          </td>
          <td class="bestnewmusic">
            <a href="/album/356763/Run-the-Jewels-Run-the-Jewels-4/">
              <b>Run the Jewels</b><br>Run the Jewels 4
            </a>
          </td>
          <td class="bestnewmusic"><span>advert</span></td>
        </tr></table></body></html>
    "#;

    #[test]
    fn test_parse_albums() {
        let items = parse_albums(HTML).unwrap();
        assert_eq!(
            items,
            vec![
                Item::new(
                    "Run the Jewels",
                    "Run the Jewels 4",
                    "https://www.sputnikmusic.com/album/356763/Run-the-Jewels-Run-the-Jewels-4/"
                ),
                Item::new(
                    "Jeff Rosenstock",
                    "NO DREAM",
                    "https://www.sputnikmusic.com/album/357694/Jeff-Rosenstock-NO-DREAM/"
                ),
            ]
        );
    }

    #[test]
    fn test_cell_without_title_fails_the_page() {
        let html = r#"
            <table><tr>
              <td class="bestnewmusic"><a href="/album/2/New/"><b>New Artist</b><br>New</a></td>
              <td class="bestnewmusic"><a href="/album/1/Marker/"><b>Marker Artist</b></a></td>
              <td class="bestnewmusic"><a href="/album/0/Old/"><b>Old Artist</b><br>Old</a></td>
            </tr></table>
        "#;

        let err = parse_albums(html).unwrap_err();
        assert!(matches!(err, AppError::Scrape { .. }));
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_albums("<html><body></body></html>").unwrap().is_empty());
    }
}
