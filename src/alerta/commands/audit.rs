use crate::commands::{load_logs, CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::{FilterState, PredicateSet};
use crate::metrics::{distinct_users, AuditMetrics};
use crate::pager::PageState;
use crate::pipeline::filter;
use crate::source::RecordSource;
use chrono::{DateTime, FixedOffset, Utc};

/// Audit log view: one page of filtered entries, the metric cards computed
/// over every filtered entry, and the user dropdown built from the whole
/// snapshot.
pub fn run<S: RecordSource>(
    source: &S,
    state: &FilterState,
    page: PageState,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let logs = load_logs(source, &mut result)?;

    let filtered = filter(&logs, &PredicateSet::from_state(state, now, offset));
    result.audit_metrics = Some(AuditMetrics::compute(&filtered, now));
    result.users = distinct_users(&logs);

    let current = page.slice(&filtered);
    if current.is_empty() {
        result.add_message(CmdMessage::info("No log entries found."));
    }
    let info = current.info();
    let items = current.items.to_vec();
    Ok(result.with_logs(items).with_page(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Field;
    use crate::source::MemorySource;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn sample_logs_page_and_metrics() {
        let source = MemorySource::sample(now());
        let result = run(&source, &FilterState::new(), PageState::default(), now(), utc()).unwrap();

        assert_eq!(result.logs.len(), 20);
        assert_eq!(result.page.unwrap().total_pages, 6);
        let metrics = result.audit_metrics.unwrap();
        assert_eq!(metrics.logins, 24);
        assert_eq!(metrics.edits, 24);
        assert_eq!(metrics.deletes, 24);
        assert_eq!(metrics.active_users, 4);
        assert_eq!(result.users.len(), 4);
    }

    #[test]
    fn metrics_follow_the_filter() {
        let source = MemorySource::sample(now());
        let state = FilterState::new()
            .with_field(Field::User, "Maria Alves")
            .with_field(Field::Action, "Todas");
        let result = run(&source, &state, PageState::default(), now(), utc()).unwrap();

        assert!(result.logs.iter().all(|l| l.user == "Maria Alves"));
        assert_eq!(result.page.unwrap().total_items, 30);
        assert_eq!(result.audit_metrics.unwrap().active_users, 1);
        // The dropdown still lists everyone.
        assert_eq!(result.users.len(), 4);
    }

    #[test]
    fn date_range_outside_data_is_empty() {
        let source = MemorySource::sample(now());
        let day = NaiveDate::from_ymd_opt(2024, 1, 1);
        let state = FilterState::new().with_date_range(day, day);
        let result = run(&source, &state, PageState::default(), now(), utc()).unwrap();

        assert!(result.logs.is_empty());
        assert_eq!(result.audit_metrics.unwrap(), AuditMetrics::default());
        assert_eq!(result.messages[0].content, "No log entries found.");
    }
}
