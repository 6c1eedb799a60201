//! Pipeline entry points.
//!
//! - `scrape`: checkpointed scrape of one source
//! - `assemble` / `should_notify`: the whole digest and its gate
//! - `deliver`: playlists and email
//! - `run`: one scheduled run, end to end

pub mod digest;
pub mod notify;
pub mod run;
pub mod scrape;

pub use digest::{assemble, should_notify};
pub use notify::{build_playlists, compose, deliver};
pub use run::{RunOptions, RunOutcome, run};
pub use scrape::{scrape, take_new};
