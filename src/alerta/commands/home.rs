use crate::catalog::TypeCatalog;
use crate::commands::{load_occurrences, CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::{FilterState, PredicateSet};
use crate::model::StatusCategory;
use crate::pipeline::derive;
use crate::source::RecordSource;
use chrono::{DateTime, FixedOffset, Utc};

/// Feed sections in display order. Open occurrences have no section of
/// their own and do not appear in the feed.
pub const FEED_BUCKETS: [StatusCategory; 3] = [
    StatusCategory::InProgress,
    StatusCategory::Closed,
    StatusCategory::Cancelled,
];

pub fn run<S: RecordSource>(
    source: &S,
    catalog: &TypeCatalog,
    state: &FilterState,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let occurrences = load_occurrences(source, catalog, &mut result)?;

    let predicates = PredicateSet::from_state(state, now, offset);
    let feed = derive(&occurrences, &predicates, &FEED_BUCKETS, |o| o.status);

    if feed.total() == 0 {
        result.add_message(CmdMessage::info("No occurrences found."));
    }
    Ok(result.with_feed(feed))
}
