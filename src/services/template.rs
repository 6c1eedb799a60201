//! Email subject and HTML body.

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::{Digest, DigestEntry};
use crate::services::PlaylistLinks;

/// `🎧 Best New Music - 19/06/2020 🎧`
pub fn subject(date: NaiveDate) -> String {
    format!("🎧 Best New Music - {} 🎧", date.format("%d/%m/%Y"))
}

/// Render the whole digest. Every interpolated string is escaped.
pub fn render(digest: &Digest, playlists: &PlaylistLinks, joke: Option<&str>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<body style=\"font-family: sans-serif;\">\n");
    html.push_str("<h1>Best New Music</h1>\n");

    if !playlists.is_empty() {
        html.push_str("<p>\n");
        if let Some(url) = &playlists.albums {
            push_link(&mut html, url, "Albums playlist on Spotify");
            html.push_str("<br>\n");
        }
        if let Some(url) = &playlists.tracks {
            push_link(&mut html, url, "Tracks playlist on Spotify");
            html.push_str("<br>\n");
        }
        html.push_str("</p>\n");
    }

    for entry in &digest.entries {
        render_entry(&mut html, entry);
    }

    if let Some(joke) = joke {
        html.push_str(&format!("<hr>\n<p><em>{}</em></p>\n", encode_text(joke)));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_entry(html: &mut String, entry: &DigestEntry) {
    html.push_str("<h2>");
    push_link(html, &entry.link, &entry.title);
    html.push_str("</h2>\n");

    if entry.errors {
        html.push_str(
            "<p style=\"color: #b00020;\">Something went wrong while checking this source. \
             It will be retried on the next run.</p>\n",
        );
        return;
    }

    if entry.items.is_empty() {
        html.push_str("<p>Nothing new this time.</p>\n");
        return;
    }

    html.push_str("<ul>\n");
    for item in &entry.items {
        html.push_str("<li>");
        push_link(html, &item.link, &format!("{} – {}", item.artist, item.title));
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}

fn push_link(html: &mut String, href: &str, text: &str) {
    html.push_str(&format!(
        "<a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(href),
        encode_text(text)
    ));
}
