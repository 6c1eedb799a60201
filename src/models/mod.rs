// src/models/mod.rs

//! Domain models for the digest application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod checkpoint;
mod config;
mod digest;
mod item;

// Re-export all public types
pub use checkpoint::Checkpoint;
pub use config::{
    Config, EmailConfig, HttpConfig, ScheduleConfig, SourcesConfig, SpotifyConfig,
    StorageConfig, YoutubeConfig, parse_weekday,
};
pub use digest::{Digest, DigestEntry};
pub use item::{Item, ItemKind};
