//! Scripted source for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Item, ItemKind};
use crate::sources::{Listing, Source};

/// Returns a fixed listing, or fails while `failing` is set.
pub struct FakeSource {
    name: String,
    listing: Listing,
    failing: Mutex<bool>,
}

impl FakeSource {
    pub fn new(name: &str, links: &[&str]) -> Self {
        Self::with_listing(name, Listing::Items(items(links)))
    }

    pub fn with_listing(name: &str, listing: Listing) -> Self {
        Self {
            name: name.to_string(),
            listing,
            failing: Mutex::new(false),
        }
    }

    pub fn failing(name: &str) -> Self {
        let source = Self::new(name, &[]);
        source.set_failing(true);
        source
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl Source for FakeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn link(&self) -> &str {
        "https://example.com/listing"
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Albums
    }

    async fn fetch(&self) -> Result<Listing> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::scrape(&self.name, "upstream unavailable"));
        }
        Ok(self.listing.clone())
    }
}

/// Items whose links are the given strings, in order.
pub fn items(links: &[&str]) -> Vec<Item> {
    links
        .iter()
        .map(|link| Item::new("Artist", format!("Title {link}"), *link))
        .collect()
}
