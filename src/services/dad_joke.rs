//! A joke for the end of the email.

use serde::Deserialize;

use crate::utils::http::fetch_json;

const DAD_JOKE_URL: &str = "https://icanhazdadjoke.com/";

/// Used whenever the joke service cannot be reached or answers nonsense.
pub const FALLBACK_JOKE: &str =
    "It would seem that I've run out of dad jokes. I hope you're happy now 😞.";

#[derive(Debug, Deserialize)]
struct JokeResponse {
    joke: String,
}

/// Fetch one random joke. Never fails; falls back to [`FALLBACK_JOKE`].
pub async fn fetch_dad_joke(client: &reqwest::Client) -> String {
    match fetch_json::<JokeResponse>(client, DAD_JOKE_URL, &[]).await {
        Ok(response) => joke_or_fallback(Some(response.joke)),
        Err(e) => {
            log::warn!("Could not fetch a dad joke: {}", e);
            joke_or_fallback(None)
        }
    }
}

fn joke_or_fallback(joke: Option<String>) -> String {
    joke.map(|j| j.trim().to_string())
        .filter(|j| !j.is_empty())
        .unwrap_or_else(|| FALLBACK_JOKE.to_string())
}
