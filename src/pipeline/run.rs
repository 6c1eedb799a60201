//! One complete digest run.

use chrono::{Datelike, Local, NaiveDate, Utc, Weekday};

use crate::error::Result;
use crate::models::{Config, Digest};
use crate::pipeline::{assemble, deliver, should_notify};
use crate::services::{
    PlaylistBuilder, PlaylistLinks, SendGridMailer, SpotifyPlaylists, fetch_dad_joke, template,
};
use crate::sources::build_sources;
use crate::storage::{CheckpointStore, LocalStorage, MemoryStorage};
use crate::utils::http::create_async_client;

/// Switches for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Ignore the configured weekday.
    pub force: bool,

    /// Scrape against a copy of the checkpoints and send nothing.
    pub dry_run: bool,
}

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Not the configured weekday.
    Skipped { today: Weekday, run_on: Weekday },

    /// Nothing new and nothing broken.
    Quiet,

    /// Email sent.
    Sent { items: usize, failures: usize },

    /// Dry run; the rendered email body is returned instead of sent.
    DryRun { digest: Digest, html: String },
}

/// Run the digest once.
pub async fn run(config: &Config, options: RunOptions) -> Result<RunOutcome> {
    config.validate()?;

    let today = Utc::now().date_naive();
    let run_on = config.run_weekday()?;
    if !options.force && today.weekday() != run_on {
        log::info!("Today is {}, digest runs on {}. Nothing to do.", today.weekday(), run_on);
        return Ok(RunOutcome::Skipped {
            today: today.weekday(),
            run_on,
        });
    }

    let client = create_async_client(&config.http)?;
    let sources = build_sources(config, &client)?;
    let local = LocalStorage::new(config.storage.dir.clone());

    if options.dry_run {
        let snapshot = MemoryStorage::snapshot_of(&local).await?;
        let digest = assemble(&sources, &snapshot, config.http.max_concurrent).await?;
        let html = template::render(&digest, &PlaylistLinks::default(), None);
        log::info!("Dry run: {} new items, nothing sent", digest.item_count());
        return Ok(RunOutcome::DryRun { digest, html });
    }

    let store: &dyn CheckpointStore = &local;
    let digest = assemble(&sources, store, config.http.max_concurrent).await?;

    if !should_notify(&digest, config.schedule.always_notify) {
        log::info!("No new music and no failures; not sending an email");
        return Ok(RunOutcome::Quiet);
    }

    notify(config, &digest, local_today(), &client).await?;

    Ok(RunOutcome::Sent {
        items: digest.item_count(),
        failures: digest.failure_count(),
    })
}

/// Date shown in the subject and playlist names, in the host's local time.
/// The weekday gate uses UTC.
fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

async fn notify(
    config: &Config,
    digest: &Digest,
    today: NaiveDate,
    client: &reqwest::Client,
) -> Result<()> {
    let joke = if config.email.dad_joke {
        Some(fetch_dad_joke(client).await)
    } else {
        None
    };

    let spotify = if config.spotify.create_playlists {
        Some(SpotifyPlaylists::from_config(client.clone(), &config.spotify)?)
    } else {
        None
    };
    let mailer = SendGridMailer::from_config(client.clone(), &config.email)?;

    deliver(
        config,
        digest,
        today,
        joke.as_deref(),
        spotify.as_ref().map(|s| s as &dyn PlaylistBuilder),
        &mailer,
    )
    .await
}
