use crate::catalog::TypeCatalog;
use crate::commands::{load_occurrences, CmdResult};
use crate::error::Result;
use crate::filter::{FilterState, PredicateSet};
use crate::metrics::{monthly_counts, DashboardMetrics};
use crate::pipeline::filter;
use crate::source::RecordSource;
use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// KPI cards and the monthly chart series over the filtered occurrences.
/// `year` defaults to the local year of `now`; months are bucketed at `offset`.
pub fn run<S: RecordSource>(
    source: &S,
    catalog: &TypeCatalog,
    state: &FilterState,
    year: Option<i32>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let occurrences = load_occurrences(source, catalog, &mut result)?;
    let filtered = filter(&occurrences, &PredicateSet::from_state(state, now, offset));

    let year = year.unwrap_or_else(|| now.with_timezone(&offset).year());
    result.dashboard = Some(DashboardMetrics::compute(&filtered));
    result.monthly = Some((year, monthly_counts(&filtered, year, offset)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Field;
    use crate::source::MemorySource;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn sample_dashboard_kpis() {
        let source = MemorySource::sample(now());
        let result = run(&source, &TypeCatalog::default(), &FilterState::new(), None, now(), utc()).unwrap();
        let kpis = result.dashboard.unwrap();

        assert_eq!(kpis.total, 12);
        assert_eq!(kpis.attended, 5);
        assert_eq!(kpis.not_attended, 5);
        assert_eq!(kpis.cancelled, 2);
        assert!((kpis.efficiency - 50.0).abs() < 1e-9);

        let (year, months) = result.monthly.unwrap();
        assert_eq!(year, 2025);
        assert_eq!(months.iter().sum::<usize>(), 12);
    }

    #[test]
    fn kpis_follow_the_filter() {
        let source = MemorySource::sample(now());
        let state = FilterState::new().with_field(Field::Status, "Cancelada");
        let result = run(&source, &TypeCatalog::default(), &state, Some(2024), now(), utc()).unwrap();
        let kpis = result.dashboard.unwrap();

        assert_eq!(kpis.total, 2);
        assert_eq!(kpis.efficiency, 0.0);
        assert_eq!(result.monthly.unwrap().1, [0; 12]);
    }
}
