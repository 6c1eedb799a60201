//! Spotify playlists built from a digest.
//!
//! One private playlist per item kind. Album items contribute every track
//! of the best search match; track items contribute the best matching
//! track. Items with no match are skipped.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{Digest, Item, ItemKind, SpotifyConfig};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_URL: &str = "https://api.spotify.com/v1";

/// Upper bound on tracks per "add items" request.
const ADD_CHUNK: usize = 100;
const ALBUM_TRACKS_LIMIT: &str = "50";

/// Links to the playlists created for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistLinks {
    pub albums: Option<String>,
    pub tracks: Option<String>,
}

impl PlaylistLinks {
    pub fn is_empty(&self) -> bool {
        self.albums.is_none() && self.tracks.is_none()
    }
}

/// Builds playlists for a digest. Has no effect on checkpoints.
#[async_trait]
pub trait PlaylistBuilder: Send + Sync {
    async fn build(&self, digest: &Digest, date: NaiveDate) -> Result<PlaylistLinks>;
}

/// [`PlaylistBuilder`] backed by the Spotify Web API.
pub struct SpotifyPlaylists {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Me {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: Option<Page<AlbumRef>>,
    tracks: Option<Page<TrackRef>>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TrackRef {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPlaylist {
    id: String,
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: String,
}

/// An authenticated session for one run.
struct Session<'a> {
    client: &'a reqwest::Client,
    token: String,
}

impl SpotifyPlaylists {
    pub fn new(
        client: reqwest::Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Build from Spotify settings; all three credentials are mandatory.
    pub fn from_config(client: reqwest::Client, config: &SpotifyConfig) -> Result<Self> {
        let present = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        let mut missing = Vec::new();
        let client_id = present(&config.client_id);
        let client_secret = present(&config.client_secret);
        let refresh_token = present(&config.refresh_token);
        if client_id.is_none() {
            missing.push("SPOTIFY_CLIENT_ID");
        }
        if client_secret.is_none() {
            missing.push("SPOTIFY_CLIENT_SECRET");
        }
        if refresh_token.is_none() {
            missing.push("SPOTIFY_REFRESH_TOKEN");
        }

        match (client_id, client_secret, refresh_token) {
            (Some(id), Some(secret), Some(token)) => Ok(Self::new(client, id, secret, token)),
            _ => Err(AppError::config(format!(
                "Missing mandatory settings: [{}]",
                missing.join(", ")
            ))),
        }
    }

    async fn authenticate(&self) -> Result<Session<'_>> {
        let response: TokenResponse = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Session {
            client: &self.client,
            token: response.access_token,
        })
    }
}

#[async_trait]
impl PlaylistBuilder for SpotifyPlaylists {
    async fn build(&self, digest: &Digest, date: NaiveDate) -> Result<PlaylistLinks> {
        let session = self.authenticate().await?;
        let user_id = session.user_id().await?;

        let mut album_uris = Vec::new();
        for item in digest.items_of_kind(ItemKind::Albums) {
            album_uris.extend(session.album_track_uris(item).await?);
        }

        let mut track_uris = Vec::new();
        for item in digest.items_of_kind(ItemKind::Tracks) {
            track_uris.extend(session.track_uri(item).await?);
        }

        Ok(PlaylistLinks {
            albums: session
                .create_playlist(&user_id, ItemKind::Albums, date, dedupe(album_uris))
                .await?,
            tracks: session
                .create_playlist(&user_id, ItemKind::Tracks, date, dedupe(track_uris))
                .await?,
        })
    }
}

impl Session<'_> {
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let value = self
            .client
            .get(format!("{API_URL}{path}"))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let value = self
            .client
            .post(format!("{API_URL}{path}"))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn user_id(&self) -> Result<String> {
        let me: Me = self.get("/me", &[]).await?;
        Ok(me.id)
    }

    async fn album_track_uris(&self, item: &Item) -> Result<Vec<String>> {
        let query = album_query(item);
        let found: SearchResponse = self
            .get("/search", &[("q", query.as_str()), ("type", "album"), ("limit", "1")])
            .await?;

        let Some(album) = found.albums.and_then(|p| p.items.into_iter().next()) else {
            log::debug!("No Spotify album for {}", query);
            return Ok(Vec::new());
        };

        let tracks: Page<TrackRef> = self
            .get(
                &format!("/albums/{}/tracks", album.id),
                &[("limit", ALBUM_TRACKS_LIMIT)],
            )
            .await?;
        Ok(tracks.items.into_iter().map(|t| t.uri).collect())
    }

    async fn track_uri(&self, item: &Item) -> Result<Option<String>> {
        let query = track_query(item);
        let found: SearchResponse = self
            .get("/search", &[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .await?;

        let uri = found
            .tracks
            .and_then(|p| p.items.into_iter().next())
            .map(|t| t.uri);
        if uri.is_none() {
            log::debug!("No Spotify track for {}", query);
        }
        Ok(uri)
    }

    /// Create and fill a playlist. Nothing is created for an empty list.
    async fn create_playlist(
        &self,
        user_id: &str,
        kind: ItemKind,
        date: NaiveDate,
        uris: Vec<String>,
    ) -> Result<Option<String>> {
        if uris.is_empty() {
            return Ok(None);
        }

        let name = playlist_name(kind, date);
        let playlist: CreatedPlaylist = self
            .post(
                &format!("/users/{user_id}/playlists"),
                &json!({ "name": name, "public": false }),
            )
            .await?;

        for chunk in uris.chunks(ADD_CHUNK) {
            let _: serde_json::Value = self
                .post(
                    &format!("/playlists/{}/tracks", playlist.id),
                    &json!({ "uris": chunk }),
                )
                .await?;
        }

        log::info!("Created playlist '{}' with {} tracks", name, uris.len());
        Ok(Some(playlist.external_urls.spotify))
    }
}

/// `artist:<a> album:<t>`
pub fn album_query(item: &Item) -> String {
    format!("artist:{} album:{}", item.artist, item.title)
}

/// `artist:<a> track:<t>`, with any featured artists cut from the title.
pub fn track_query(item: &Item) -> String {
    let title = item
        .title
        .split_once(" ft. ")
        .map_or(item.title.as_str(), |(head, _)| head);
    format!("artist:{} track:{}", item.artist, title.trim())
}

/// `Best New Music Digest (Albums) - 19/06/2020`
pub fn playlist_name(kind: ItemKind, date: NaiveDate) -> String {
    format!(
        "Best New Music Digest ({}) - {}",
        kind.label(),
        date.format("%d/%m/%Y")
    )
}

/// Drop repeated URIs, keeping first occurrences in order.
pub fn dedupe(uris: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    uris.into_iter()
        .filter(|uri| seen.insert(uri.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries() {
        let album = Item::new("Run the Jewels", "RTJ4", "l");
        assert_eq!(album_query(&album), "artist:Run the Jewels album:RTJ4");

        let track = Item::new(
            "Run the Jewels",
            "Ooh La La ft. Greg Nice & DJ Premier",
            "l",
        );
        assert_eq!(
            track_query(&track),
            "artist:Run the Jewels track:Ooh La La"
        );
    }

    #[test]
    fn test_playlist_name() {
        let date = NaiveDate::from_ymd_opt(2020, 6, 5).unwrap();
        assert_eq!(
            playlist_name(ItemKind::Tracks, date),
            "Best New Music Digest (Tracks) - 05/06/2020"
        );
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let uris = vec!["a", "b", "a", "c", "b"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedupe(uris), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_search_response_shapes() {
        let albums: SearchResponse =
            serde_json::from_str(r#"{"albums":{"items":[{"id":"4FftCsAcXXD1nFO9RFUNFO"}]}}"#)
                .unwrap();
        assert_eq!(albums.albums.unwrap().items[0].id, "4FftCsAcXXD1nFO9RFUNFO");

        let tracks: SearchResponse =
            serde_json::from_str(r#"{"tracks":{"items":[]}}"#).unwrap();
        assert!(tracks.tracks.unwrap().items.is_empty());
    }

    #[test]
    fn test_from_config_lists_missing_credentials() {
        let config = SpotifyConfig {
            create_playlists: true,
            client_id: Some("id".into()),
            ..SpotifyConfig::default()
        };
        let err = SpotifyPlaylists::from_config(reqwest::Client::new(), &config)
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing mandatory settings: [SPOTIFY_CLIENT_SECRET, SPOTIFY_REFRESH_TOKEN]"
        );
    }
}
