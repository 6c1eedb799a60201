//! Clients for the outside world.
//!
//! - YouTube playlist listing (`YoutubeClient`)
//! - Dad joke lookup (`fetch_dad_joke`)
//! - Email delivery through SendGrid (`Mailer`, `SendGridMailer`)
//! - Spotify playlist creation (`PlaylistBuilder`, `SpotifyPlaylists`)
//! - Email rendering (`template`)

pub mod dad_joke;
pub mod sendgrid;
pub mod spotify;
pub mod template;
pub mod youtube;

pub use dad_joke::{FALLBACK_JOKE, fetch_dad_joke};
pub use sendgrid::{EmailMessage, Mailer, SendGridMailer};
pub use spotify::{PlaylistBuilder, PlaylistLinks, SpotifyPlaylists};
pub use youtube::{PlaylistVideo, YoutubeClient};
