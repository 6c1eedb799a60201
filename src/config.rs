// src/config.rs

//! Configuration loading utilities.
//!
//! Settings come from an optional TOML file, then environment variables
//! override individual values. Variable names:
//!
//! | Variable | Setting |
//! |---|---|
//! | `DAY_OF_WEEK_TO_RUN` | `schedule.run_on` |
//! | `ALWAYS_EMAIL` | `schedule.always_notify` |
//! | `PITCHFORK_ALBUMS`, `PITCHFORK_TRACKS`, `SPUTNIKMUSIC_ALBUMS`, `THE_NEEDLE_DROP_ALBUMS`, `THE_NEEDLE_DROP_TRACKS` | `sources.*` |
//! | `CHECKPOINT_DIR` | `storage.dir` |
//! | `RECIPIENT_EMAIL`, `SENDER_EMAIL`, `SENDER_NAME` | `email.*` |
//! | `SENDER_PASSWORD` | `email.sendgrid_api_key` |
//! | `DAD_JOKE` | `email.dad_joke` |
//! | `YOUTUBE_API_KEY` | `youtube.api_key` |
//! | `CREATE_SPOTIFY_PLAYLISTS` | `spotify.create_playlists` |
//! | `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `SPOTIFY_REFRESH_TOKEN` | `spotify.*` |

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Config;

/// Overlay settings found through `lookup` onto `config`.
///
/// Booleans are true only when the value equals `true`, ignoring case.
pub fn apply_env_with<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let flag = |name: &str, target: &mut bool| {
        if let Some(value) = lookup(name) {
            *target = value.trim().eq_ignore_ascii_case("true");
        }
    };

    flag("ALWAYS_EMAIL", &mut config.schedule.always_notify);
    flag("PITCHFORK_ALBUMS", &mut config.sources.pitchfork_albums);
    flag("PITCHFORK_TRACKS", &mut config.sources.pitchfork_tracks);
    flag("SPUTNIKMUSIC_ALBUMS", &mut config.sources.sputnikmusic_albums);
    flag(
        "THE_NEEDLE_DROP_ALBUMS",
        &mut config.sources.the_needle_drop_albums,
    );
    flag(
        "THE_NEEDLE_DROP_TRACKS",
        &mut config.sources.the_needle_drop_tracks,
    );
    flag("DAD_JOKE", &mut config.email.dad_joke);
    flag(
        "CREATE_SPOTIFY_PLAYLISTS",
        &mut config.spotify.create_playlists,
    );

    if let Some(day) = lookup("DAY_OF_WEEK_TO_RUN") {
        config.schedule.run_on = day;
    }
    if let Some(dir) = lookup("CHECKPOINT_DIR") {
        config.storage.dir = PathBuf::from(dir);
    }
    if let Some(name) = lookup("SENDER_NAME") {
        config.email.sender_name = name;
    }

    let text = |name: &str, target: &mut Option<String>| {
        if let Some(value) = lookup(name) {
            *target = Some(value);
        }
    };

    text("RECIPIENT_EMAIL", &mut config.email.recipient_email);
    text("SENDER_EMAIL", &mut config.email.sender_email);
    text("SENDER_PASSWORD", &mut config.email.sendgrid_api_key);
    text("YOUTUBE_API_KEY", &mut config.youtube.api_key);
    text("SPOTIFY_CLIENT_ID", &mut config.spotify.client_id);
    text("SPOTIFY_CLIENT_SECRET", &mut config.spotify.client_secret);
    text("SPOTIFY_REFRESH_TOKEN", &mut config.spotify.refresh_token);
}

/// Overlay settings from the process environment.
pub fn apply_env(config: &mut Config) {
    apply_env_with(config, |name| std::env::var(name).ok());
}

/// Load the config file (defaults if absent) and apply the environment.
pub fn load(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        log::info!(
            "No config file at {}; using defaults and environment",
            path.display()
        );
        Config::default()
    };

    apply_env(&mut config);
    Ok(config)
}

/// [`load`], then validate.
///
/// A missing mandatory setting is fatal here, before any source is scraped.
pub fn load_all(path: &Path) -> Result<Config> {
    let config = load(path)?;
    config.validate()?;
    Ok(config)
}
