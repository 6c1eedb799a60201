// src/lib.rs

//! Best New Music Digest
//!
//! Scrapes "best new music" listings, keeps a per-source checkpoint of the
//! newest item already reported, and emails what is new.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod sources;
pub mod storage;
pub mod utils;
