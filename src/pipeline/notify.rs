//! Everything that happens after the digest is assembled.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{Config, Digest};
use crate::services::template;
use crate::services::{EmailMessage, Mailer, PlaylistBuilder, PlaylistLinks};

/// Build playlists when enabled and there is something to put in them.
pub async fn build_playlists(
    config: &Config,
    digest: &Digest,
    date: NaiveDate,
    builder: Option<&dyn PlaylistBuilder>,
) -> Result<PlaylistLinks> {
    if !config.spotify.create_playlists || !digest.has_items() {
        return Ok(PlaylistLinks::default());
    }
    let Some(builder) = builder else {
        return Ok(PlaylistLinks::default());
    };

    builder.build(digest, date).await
}

/// Render the email for a digest.
pub fn compose(
    config: &Config,
    digest: &Digest,
    date: NaiveDate,
    playlists: &PlaylistLinks,
    joke: Option<&str>,
) -> Result<EmailMessage> {
    let email = &config.email;
    let required = |value: &Option<String>, name: &str| {
        value
            .clone()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::config(format!("Missing mandatory settings: [{name}]")))
    };

    Ok(EmailMessage {
        from_email: required(&email.sender_email, "SENDER_EMAIL")?,
        from_name: email.sender_name.clone(),
        to_email: required(&email.recipient_email, "RECIPIENT_EMAIL")?,
        subject: template::subject(date),
        html: template::render(digest, playlists, joke),
    })
}

/// Build playlists, render and send the digest email.
pub async fn deliver(
    config: &Config,
    digest: &Digest,
    date: NaiveDate,
    joke: Option<&str>,
    playlists: Option<&dyn PlaylistBuilder>,
    mailer: &dyn Mailer,
) -> Result<()> {
    let links = build_playlists(config, digest, date, playlists).await?;
    let message = compose(config, digest, date, &links, joke)?;
    mailer.send(&message).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::models::{DigestEntry, Item, ItemKind};

    struct FakeBuilder;

    #[async_trait]
    impl PlaylistBuilder for FakeBuilder {
        async fn build(&self, _digest: &Digest, _date: NaiveDate) -> Result<PlaylistLinks> {
            Ok(PlaylistLinks {
                albums: Some("https://open.spotify.com/playlist/albums".into()),
                tracks: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.email.recipient_email = Some("me@example.com".into());
        config.email.sender_email = Some("digest@example.com".into());
        config
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, 19).unwrap()
    }

    fn busy_digest() -> Digest {
        Digest::new(vec![DigestEntry::found(
            "Pitchfork Albums",
            "https://www.pitchfork.com/reviews/best/albums/",
            ItemKind::Albums,
            vec![Item::new("Run the Jewels", "RTJ4", "https://example.com/rtj4")],
        )])
    }

    #[tokio::test]
    async fn test_playlists_skipped_when_disabled() {
        let links = build_playlists(&config(), &busy_digest(), date(), Some(&FakeBuilder))
            .await
            .unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_playlists_skipped_without_items() {
        let mut config = config();
        config.spotify.create_playlists = true;
        let quiet = Digest::new(vec![DigestEntry::failed(
            "Pitchfork Albums",
            "https://www.pitchfork.com/reviews/best/albums/",
            ItemKind::Albums,
        )]);

        let links = build_playlists(&config, &quiet, date(), Some(&FakeBuilder))
            .await
            .unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_deliver_sends_one_email() {
        let mut config = config();
        config.spotify.create_playlists = true;
        let mailer = RecordingMailer::default();

        deliver(
            &config,
            &busy_digest(),
            date(),
            Some("joke"),
            Some(&FakeBuilder),
            &mailer,
        )
        .await
        .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "me@example.com");
        assert_eq!(sent[0].from_name, "Best New Music Digest");
        assert_eq!(sent[0].subject, "🎧 Best New Music - 19/06/2020 🎧");
        assert!(sent[0].html.contains("https://open.spotify.com/playlist/albums"));
        assert!(sent[0].html.contains("joke"));
    }

    #[test]
    fn test_compose_requires_recipient() {
        let mut config = config();
        config.email.recipient_email = None;
        let result = compose(&config, &busy_digest(), date(), &PlaylistLinks::default(), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
