//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// When to run and when to notify
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Per-source enable flags
    #[serde(default)]
    pub sources: SourcesConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Checkpoint storage location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Email addressing and delivery
    #[serde(default)]
    pub email: EmailConfig,

    /// YouTube Data API access
    #[serde(default)]
    pub youtube: YoutubeConfig,

    /// Spotify playlist creation
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Weekday on which a scheduled run does any work.
    pub fn run_weekday(&self) -> Result<Weekday> {
        parse_weekday(&self.schedule.run_on).ok_or_else(|| {
            AppError::config(format!(
                "schedule.run_on must be a weekday name, got '{}'",
                self.schedule.run_on
            ))
        })
    }

    /// Whether any enabled source reads from the YouTube API.
    pub fn needs_youtube(&self) -> bool {
        self.sources.the_needle_drop_albums || self.sources.the_needle_drop_tracks
    }

    /// Names of mandatory settings that are missing for the enabled feature set.
    ///
    /// Settings are reported by their environment variable names.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if is_blank(&self.email.recipient_email) {
            missing.push("RECIPIENT_EMAIL");
        }
        if is_blank(&self.email.sender_email) {
            missing.push("SENDER_EMAIL");
        }
        if is_blank(&self.email.sendgrid_api_key) {
            missing.push("SENDER_PASSWORD");
        }
        if self.needs_youtube() && is_blank(&self.youtube.api_key) {
            missing.push("YOUTUBE_API_KEY");
        }
        if self.spotify.create_playlists {
            if is_blank(&self.spotify.client_id) {
                missing.push("SPOTIFY_CLIENT_ID");
            }
            if is_blank(&self.spotify.client_secret) {
                missing.push("SPOTIFY_CLIENT_SECRET");
            }
            if is_blank(&self.spotify.refresh_token) {
                missing.push("SPOTIFY_REFRESH_TOKEN");
            }
        }

        missing
    }

    /// Validate configuration values and mandatory settings.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_settings();
        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Missing mandatory settings: [{}]",
                missing.join(", ")
            )));
        }

        self.run_weekday()?;

        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Parse a full English weekday name, case-insensitively.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Scheduling gate and notification override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Weekday name; runs on any other day are no-ops
    #[serde(default = "defaults::run_on")]
    pub run_on: String,

    /// Send the digest even when nothing is new
    #[serde(default)]
    pub always_notify: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_on: defaults::run_on(),
            always_notify: false,
        }
    }
}

/// One enable flag per source. All default to on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "defaults::enabled")]
    pub pitchfork_albums: bool,

    #[serde(default = "defaults::enabled")]
    pub pitchfork_tracks: bool,

    #[serde(default = "defaults::enabled")]
    pub sputnikmusic_albums: bool,

    #[serde(default = "defaults::enabled")]
    pub the_needle_drop_albums: bool,

    #[serde(default = "defaults::enabled")]
    pub the_needle_drop_tracks: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            pitchfork_albums: true,
            pitchfork_tracks: true,
            sputnikmusic_albums: true,
            the_needle_drop_albums: true,
            the_needle_drop_tracks: true,
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Sources fetched at once (1 = one after another)
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Checkpoint storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `checkpoints.json`
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
        }
    }
}

/// Email addressing and delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub recipient_email: Option<String>,

    #[serde(default)]
    pub sender_email: Option<String>,

    #[serde(default = "defaults::sender_name")]
    pub sender_name: String,

    /// SendGrid API key
    #[serde(default)]
    pub sendgrid_api_key: Option<String>,

    /// Append a dad joke to the email
    #[serde(default = "defaults::enabled")]
    pub dad_joke: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            recipient_email: None,
            sender_email: None,
            sender_name: defaults::sender_name(),
            sendgrid_api_key: None,
            dad_joke: true,
        }
    }
}

/// YouTube Data API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoutubeConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Spotify playlist settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// Build album and track playlists from the digest
    #[serde(default)]
    pub create_playlists: bool,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// Long-lived refresh token for the playlist owner
    #[serde(default)]
    pub refresh_token: Option<String>,
}

mod defaults {
    use std::path::PathBuf;

    pub fn run_on() -> String {
        "friday".into()
    }
    pub fn enabled() -> bool {
        true
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; best-new-music-digest/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        1
    }
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn sender_name() -> String {
        "Best New Music Digest".into()
    }
}
