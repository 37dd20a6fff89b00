//! # Record Sources
//!
//! The [`RecordSource`] trait is the only I/O boundary of the library.
//! Sources hand back **raw** records exactly as stored or served; turning
//! them into canonical records is the normalizer's job, so every source gets
//! the same integrity checks for free.
//!
//! ## Implementations
//!
//! - [`http::HttpSource`]: the dispatch center's JSON API, one blocking GET
//!   per fetch, bearer token from the [`crate::session::Session`]
//! - [`file::FileSource`]: a directory of JSON snapshots
//!   ```text
//!   data/
//!   ├── occurrences.json   # array of raw occurrences
//!   ├── logs.json          # array of raw audit entries
//!   └── profile.json       # raw profile of the current user
//!   ```
//! - [`memory::MemorySource`]: in-memory vectors for tests, plus the demo
//!   data set used by `--mock`
//!
//! Fetches are not retried and never return partial data: a failed fetch is
//! an error for the whole view.

use crate::error::Result;
use crate::model::OccurrenceDraft;
use crate::normalize::{RawLogEntry, RawOccurrence, RawProfile};

pub mod file;
pub mod http;
pub mod memory;

pub use file::FileSource;
pub use http::HttpSource;
pub use memory::MemorySource;

pub trait RecordSource {
    /// Current occurrence snapshot, most recent first as served.
    fn fetch_occurrences(&self) -> Result<Vec<RawOccurrence>>;

    fn fetch_logs(&self) -> Result<Vec<RawLogEntry>>;

    fn fetch_profile(&self) -> Result<RawProfile>;

    /// Stores a new occurrence and returns the id it was given.
    fn submit_occurrence(&mut self, draft: &OccurrenceDraft) -> Result<u64>;
}

/// Next free occurrence id in a snapshot.
pub(crate) fn next_id(raws: &[RawOccurrence]) -> u64 {
    raws.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1
}
