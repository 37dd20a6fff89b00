//! Summary counts shown above the audit table and on the dashboard.
//!
//! All metrics are computed over whatever slice they are given, which is
//! normally the filtered collection, so the cards always agree with the rows
//! below them.

use crate::model::{LogAction, LogEntry, Occurrence, Priority, StatusCategory};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};
use std::collections::BTreeSet;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditMetrics {
    pub logins: usize,
    pub edits: usize,
    pub deletes: usize,
    /// Distinct users with at least one entry in the 24 hours before `now`.
    pub active_users: usize,
}

impl AuditMetrics {
    pub fn compute(entries: &[LogEntry], now: DateTime<Utc>) -> Self {
        let count = |action: LogAction| entries.iter().filter(|l| l.action == action).count();
        let since = now - Duration::hours(24);
        let active: BTreeSet<&str> = entries
            .iter()
            .filter(|l| l.timestamp >= since && l.timestamp <= now)
            .map(|l| l.user.as_str())
            .collect();

        Self {
            logins: count(LogAction::Login),
            edits: count(LogAction::Edited),
            deletes: count(LogAction::Deleted),
            active_users: active.len(),
        }
    }
}

/// Distinct users, sorted, for the user dropdown.
pub fn distinct_users(entries: &[LogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|l| l.user.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total: usize,
    /// Closed occurrences.
    pub attended: usize,
    /// Open and in-progress occurrences.
    pub not_attended: usize,
    pub cancelled: usize,
    /// `attended / (total - cancelled)` as a percentage, 0 when nothing counts.
    pub efficiency: f64,
    pub by_priority: Vec<(Priority, usize)>,
}

impl DashboardMetrics {
    pub fn compute(occurrences: &[Occurrence]) -> Self {
        let total = occurrences.len();
        let attended = count_where(occurrences, |o| o.status == StatusCategory::Closed);
        let cancelled = count_where(occurrences, |o| o.status == StatusCategory::Cancelled);
        let not_attended = count_where(occurrences, |o| {
            matches!(o.status, StatusCategory::Open | StatusCategory::InProgress)
        });

        let countable = total - cancelled;
        let efficiency = if countable == 0 {
            0.0
        } else {
            attended as f64 * 100.0 / countable as f64
        };

        let by_priority = Priority::ALL
            .iter()
            .map(|p| (*p, count_where(occurrences, |o| o.priority == *p)))
            .collect();

        Self {
            total,
            attended,
            not_attended,
            cancelled,
            efficiency,
            by_priority,
        }
    }
}

fn count_where(occurrences: &[Occurrence], pred: impl Fn(&Occurrence) -> bool) -> usize {
    occurrences.iter().filter(|o| pred(o)).count()
}

/// Occurrences per calendar month of `year` at `offset`, January first.
pub fn monthly_counts(occurrences: &[Occurrence], year: i32, offset: FixedOffset) -> [usize; 12] {
    let mut months = [0; 12];
    for local in occurrences.iter().map(|o| o.timestamp.with_timezone(&offset)) {
        if local.year() == year {
            months[local.month0() as usize] += 1;
        }
    }
    months
}
