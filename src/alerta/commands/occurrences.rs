use crate::catalog::TypeCatalog;
use crate::commands::{load_occurrences, CmdMessage, CmdResult};
use crate::error::{AlertaError, Result};
use crate::filter::{FilterState, PredicateSet};
use crate::model::Occurrence;
use crate::pager::PageState;
use crate::pipeline::filter;
use crate::source::RecordSource;
use chrono::{DateTime, FixedOffset, Utc};

/// Entries in the "latest occurrences" list beside the details view.
pub const LATEST_COUNT: usize = 5;

pub fn list<S: RecordSource>(
    source: &S,
    catalog: &TypeCatalog,
    state: &FilterState,
    page: PageState,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let occurrences = load_occurrences(source, catalog, &mut result)?;

    let filtered = filter(&occurrences, &PredicateSet::from_state(state, now, offset));
    let current = page.slice(&filtered);
    if current.is_empty() {
        result.add_message(CmdMessage::info("No occurrences found."));
    }

    let info = current.info();
    let items = current.items.to_vec();
    Ok(result.with_occurrences(items).with_page(info))
}

/// One occurrence plus the most recent others, newest first.
pub fn show<S: RecordSource>(source: &S, catalog: &TypeCatalog, id: u64) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let occurrences = load_occurrences(source, catalog, &mut result)?;

    let target = occurrences
        .iter()
        .find(|o| o.id == id)
        .cloned()
        .ok_or_else(|| AlertaError::NotFound(format!("occurrence {}", id)))?;

    let mut latest: Vec<Occurrence> = occurrences.into_iter().filter(|o| o.id != id).collect();
    // Stable sort keeps upstream order among equal timestamps.
    latest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    latest.truncate(LATEST_COUNT);

    result.latest = latest;
    Ok(result.with_occurrences(vec![target]))
}
