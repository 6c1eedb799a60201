//! YouTube Data API playlist listing.

use serde::Deserialize;

use crate::error::Result;
use crate::utils::http::fetch_json;

const PLAYLIST_ITEMS_URL: &str = "https://www.googleapis.com/youtube/v3/playlistItems";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Page size requested from the API (the API maximum).
const MAX_RESULTS: &str = "50";

/// A video as listed in a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistVideo {
    pub title: String,
    pub description: String,
    /// `https://www.youtube.com/watch?v=<id>`
    pub link: String,
}

impl PlaylistVideo {
    pub fn new(video_id: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: format!("{WATCH_URL}{video_id}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

/// Client for the `playlistItems` endpoint, one request per call.
#[derive(Clone)]
pub struct YoutubeClient {
    client: reqwest::Client,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// First page of a playlist, in playlist order.
    pub async fn playlist_videos(&self, playlist_id: &str) -> Result<Vec<PlaylistVideo>> {
        let response: PlaylistItemsResponse = fetch_json(
            &self.client,
            PLAYLIST_ITEMS_URL,
            &[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", MAX_RESULTS),
                ("key", &self.api_key),
            ],
        )
        .await?;

        log::debug!(
            "Playlist {} returned {} items",
            playlist_id,
            response.items.len()
        );
        Ok(videos_from(response))
    }
}

fn videos_from(response: PlaylistItemsResponse) -> Vec<PlaylistVideo> {
    response
        .items
        .into_iter()
        .map(|item| {
            PlaylistVideo::new(
                &item.snippet.resource_id.video_id,
                item.snippet.title,
                item.snippet.description,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlist_items() {
        let json = r#"{
            "kind": "youtube#playlistItemListResponse",
            "items": [
                {
                    "snippet": {
                        "title": "Run the Jewels - RTJ4 ALBUM REVIEW",
                        "description": "Listen: ...",
                        "resourceId": { "kind": "youtube#video", "videoId": "xjNG90UjuII" }
                    }
                },
                {
                    "snippet": {
                        "title": "Private video",
                        "resourceId": { "kind": "youtube#video", "videoId": "abc" }
                    }
                }
            ]
        }"#;

        let response: PlaylistItemsResponse = serde_json::from_str(json).unwrap();
        let videos = videos_from(response);

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].link, "https://www.youtube.com/watch?v=xjNG90UjuII");
        assert_eq!(videos[0].title, "Run the Jewels - RTJ4 ALBUM REVIEW");
        assert_eq!(videos[1].description, "");
    }

    #[test]
    fn test_missing_items_is_empty() {
        let response: PlaylistItemsResponse = serde_json::from_str("{}").unwrap();
        assert!(videos_from(response).is_empty());
    }
}
