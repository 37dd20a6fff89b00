//! # Filter Predicate Set
//!
//! A [`FilterState`] holds what the user selected in a view's filter bar.
//! [`PredicateSet::from_state`] compiles it into one [`Criterion`] per active
//! dimension; a record passes when every criterion holds. Dimensions left at
//! their "no filter" sentinel compile to nothing, so an untouched filter bar
//! lets everything through.
//!
//! Criteria are independent and pure, so evaluation order never changes the
//! result.
//!
//! ## Matching rules
//!
//! - `period`: timestamp at or after `now - N days`
//! - exact dimensions (`type`, `region`, `status`, ...): folded key equality,
//!   see [`fold_key`]
//! - `date_from` / `date_to`: inclusive calendar days at the display offset,
//!   `date_to` extends to 23:59:59.999 local time
//! - `query`: case-insensitive substring over the record's searchable fields

use crate::error::{AlertaError, Result};
use crate::model::{LogAction, LogEntry, LogModule, Occurrence, Priority, StatusCategory};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Values that mean "no filter" in a dropdown.
const SENTINELS: &[&str] = &["todos", "todas", "all"];

/// Lowercases, strips Portuguese diacritics and turns `_`/whitespace runs
/// into a single `-`.
pub fn fold_key(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().chars().flat_map(char::to_lowercase) {
        let folded = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            '_' | '-' => '-',
            c if c.is_whitespace() => '-',
            other => other,
        };
        if folded == '-' && out.ends_with('-') {
            continue;
        }
        out.push(folded);
    }
    out
}

fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || SENTINELS.contains(&fold_key(trimmed).as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub fn days(&self) -> i64 {
        match self {
            Period::Today => 1,
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
            Period::Year => 365,
        }
    }
}

impl FromStr for Period {
    type Err = AlertaError;

    fn from_str(s: &str) -> Result<Self> {
        match fold_key(s).as_str() {
            "today" | "hoje" | "1d" => Ok(Period::Today),
            "week" | "semana" | "7d" => Ok(Period::Week),
            "month" | "mes" | "30d" => Ok(Period::Month),
            "quarter" | "trimestre" | "90d" => Ok(Period::Quarter),
            "year" | "ano" | "365d" => Ok(Period::Year),
            _ => Err(AlertaError::Api(format!("Unknown period: {}", s))),
        }
    }
}

/// Exact-match filter dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Type,
    Region,
    Status,
    Priority,
    User,
    Action,
    Module,
}

/// What a record exposes to the predicate set.
pub trait Filterable {
    fn timestamp(&self) -> DateTime<Utc>;

    /// Folded keys this record answers to for `field`. Empty when the record
    /// has no such dimension, which makes any filter on it exclude the record.
    fn field_keys(&self, field: Field) -> Vec<String>;

    /// Fields searched by the free-text query.
    fn search_fields(&self) -> Vec<&str>;
}

impl Filterable for Occurrence {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn field_keys(&self, field: Field) -> Vec<String> {
        match field {
            Field::Type => {
                let mut keys = vec![fold_key(&self.type_name)];
                if let Some(id) = self.type_id {
                    keys.push(id.to_string());
                }
                keys
            }
            Field::Region => self.region.iter().map(|r| fold_key(r)).collect(),
            Field::Status => vec![self.status.key().to_string()],
            Field::Priority => vec![fold_key(self.priority.label())],
            Field::User | Field::Action | Field::Module => Vec::new(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.type_name.as_str()];
        fields.extend(self.details.as_deref());
        fields.extend(self.victims.as_deref());
        fields.extend(self.address.as_deref());
        fields
    }
}

impl Filterable for LogEntry {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn field_keys(&self, field: Field) -> Vec<String> {
        match field {
            Field::User => vec![fold_key(&self.user)],
            Field::Action => vec![fold_key(self.action.label())],
            Field::Module => vec![fold_key(self.module.label())],
            _ => Vec::new(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.user.as_str(),
            self.description.as_str(),
            self.module.label(),
            self.ip.as_str(),
        ]
    }
}

/// Current filter bar selections of a view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    period: Option<Period>,
    fields: BTreeMap<Field, String>,
    query: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_period(mut self, period: Option<Period>) -> Self {
        self.period = period;
        self
    }

    pub fn with_field(mut self, field: Field, value: &str) -> Self {
        self.set_field(field, value);
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.set_query(query);
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Sets an exact-match dimension; sentinel values clear it.
    ///
    /// Closed enumerations go through their lookup tables so that every
    /// spelling the normalizer accepts also works as a filter value.
    pub fn set_field(&mut self, field: Field, value: &str) {
        if is_sentinel(value) {
            self.fields.remove(&field);
            return;
        }
        let key = match field {
            Field::Status => StatusCategory::parse(value).map(|s| s.key().to_string()),
            Field::Priority => Priority::parse(value).map(|p| fold_key(p.label())),
            Field::Action => LogAction::parse(value).map(|a| fold_key(a.label())),
            Field::Module => LogModule::parse(value).map(|m| fold_key(m.label())),
            Field::Type | Field::Region | Field::User => None,
        };
        self.fields
            .insert(field, key.unwrap_or_else(|| fold_key(value)));
    }

    pub fn set_query(&mut self, query: &str) {
        let trimmed = query.trim();
        self.query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
    }

    pub fn set_period(&mut self, period: Option<Period>) {
        self.period = period;
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn date_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.date_from, self.date_to)
    }

    pub fn is_empty(&self) -> bool {
        self.period.is_none()
            && self.fields.is_empty()
            && self.query.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}

/// One compiled filter dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Since(DateTime<Utc>),
    From(DateTime<Utc>),
    Until(DateTime<Utc>),
    Equals(Field, String),
    Contains(String),
}

impl Criterion {
    pub fn eval<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        match self {
            Criterion::Since(t) | Criterion::From(t) => record.timestamp() >= *t,
            Criterion::Until(t) => record.timestamp() <= *t,
            Criterion::Equals(field, wanted) => {
                record.field_keys(*field).iter().any(|k| k == wanted)
            }
            Criterion::Contains(needle) => record
                .search_fields()
                .iter()
                .any(|f| f.to_lowercase().contains(needle.as_str())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    criteria: Vec<Criterion>,
}

impl PredicateSet {
    /// A predicate set that accepts every record.
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// `offset` is the display offset the user reads dates in; calendar-day
    /// bounds are taken at that offset.
    pub fn from_state(state: &FilterState, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let mut criteria = Vec::new();

        if let Some(period) = state.period {
            criteria.push(Criterion::Since(now - Duration::days(period.days())));
        }
        for (field, value) in &state.fields {
            criteria.push(Criterion::Equals(*field, value.clone()));
        }
        if let Some(from) = state.date_from {
            criteria.push(Criterion::From(start_of_day(from, offset)));
        }
        if let Some(to) = state.date_to {
            criteria.push(Criterion::Until(end_of_day(to, offset)));
        }
        if let Some(query) = &state.query {
            criteria.push(Criterion::Contains(query.clone()));
        }

        tracing::debug!(criteria = criteria.len(), "compiled filter predicates");
        Self { criteria }
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.criteria.iter().all(|c| c.eval(record))
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Local midnight of `date` at `offset`, as a UTC instant.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::MIN).and_utc();
    local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))
}

/// Last millisecond of `date` at `offset`, 23:59:59.999 local time.
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    start_of_day(date, offset) + Duration::days(1) - Duration::milliseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn occurrence(id: u64, type_id: u32, type_name: &str, day: u32) -> Occurrence {
        Occurrence {
            id,
            timestamp: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            status: StatusCategory::InProgress,
            type_id: Some(type_id),
            type_name: type_name.to_string(),
            type_description: "Sem descrição".to_string(),
            priority: Priority::High,
            title: format!("Ocorrência #{}", id),
            subtype: None,
            victims: None,
            details: Some(format!("detalhes {}", id)),
            region: Some("Região Metropolitana".to_string()),
            address: None,
            team: None,
        }
    }

    fn log(id: &str, user: &str, action: LogAction, ip: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
            user: user.to_string(),
            action,
            module: LogModule::System,
            description: "Acesso ao painel operacional".to_string(),
            ip: ip.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    #[test]
    fn fold_key_strips_accents_and_separators() {
        assert_eq!(fold_key("Incêndio"), "incendio");
        assert_eq!(fold_key("Em_andamento"), "em-andamento");
        assert_eq!(fold_key("  EM   ANDAMENTO "), "em-andamento");
        assert_eq!(fold_key("Ocorrências"), "ocorrencias");
    }

    #[test]
    fn empty_state_compiles_to_accept_all() {
        let state = FilterState::new()
            .with_field(Field::Type, "Todos")
            .with_field(Field::Action, "Todas")
            .with_query("   ");
        assert!(state.is_empty());
        let predicates = PredicateSet::from_state(&state, now(), utc());
        assert!(predicates.is_empty());
        assert!(predicates.matches(&occurrence(1, 1, "Incêndio", 1)));
    }

    #[test]
    fn type_filter_matches_folded_name() {
        let records = vec![
            occurrence(1, 1, "Incêndio", 1),
            occurrence(2, 2, "Resgate", 2),
            occurrence(3, 1, "Incêndio", 3),
            occurrence(4, 3, "APH", 4),
            occurrence(5, 4, "Prevenção", 5),
        ];
        let state = FilterState::new().with_field(Field::Type, "incendio");
        let predicates = PredicateSet::from_state(&state, now(), utc());

        let ids: Vec<u64> = records
            .iter()
            .filter(|r| predicates.matches(*r))
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn type_filter_accepts_numeric_id() {
        let state = FilterState::new().with_field(Field::Type, "2");
        let predicates = PredicateSet::from_state(&state, now(), utc());
        assert!(predicates.matches(&occurrence(2, 2, "Resgate", 2)));
        assert!(!predicates.matches(&occurrence(1, 1, "Incêndio", 1)));
    }

    #[test]
    fn status_filter_uses_lookup_table() {
        let state = FilterState::new().with_field(Field::Status, "EM ANDAMENTO");
        assert_eq!(state.field(Field::Status), Some("em-andamento"));
        let predicates = PredicateSet::from_state(&state, now(), utc());
        assert!(predicates.matches(&occurrence(1, 1, "Incêndio", 1)));

        let closed = FilterState::new().with_field(Field::Status, "Encerrada");
        assert!(!PredicateSet::from_state(&closed, now(), utc()).matches(&occurrence(1, 1, "x", 1)));
    }

    #[test]
    fn date_range_is_inclusive_through_end_of_day() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let state = FilterState::new().with_date_range(Some(from), Some(to));
        let predicates = PredicateSet::from_state(&state, now(), utc());

        let records: Vec<Occurrence> = (1..=6).map(|d| occurrence(d as u64, 1, "x", d)).collect();
        let kept: Vec<&Occurrence> = records.iter().filter(|r| predicates.matches(*r)).collect();

        assert_eq!(kept.len(), 3);
        for r in kept {
            assert!(r.timestamp >= start_of_day(from, utc()));
            assert!(r.timestamp <= end_of_day(to, utc()));
        }
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let eod = end_of_day(day, utc());
        let expected =
            Utc.with_ymd_and_hms(2025, 3, 4, 23, 59, 59).unwrap() + Duration::milliseconds(999);
        assert_eq!(eod, expected);
    }

    #[test]
    fn day_bounds_follow_the_display_offset() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            start_of_day(day, brt()),
            Utc.with_ymd_and_hms(2025, 3, 10, 3, 0, 0).unwrap()
        );
        assert_eq!(
            end_of_day(day, brt()),
            Utc.with_ymd_and_hms(2025, 3, 11, 2, 59, 59).unwrap() + Duration::milliseconds(999)
        );
    }

    #[test]
    fn local_evening_stays_on_its_own_day() {
        // 22:00 at -03:00 is 01:00 UTC the next day.
        let mut record = occurrence(1, 1, "Incêndio", 10);
        record.timestamp = Utc.with_ymd_and_hms(2025, 3, 11, 1, 0, 0).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 3, 10);
        let same_day = FilterState::new().with_date_range(day, day);
        assert!(PredicateSet::from_state(&same_day, now(), brt()).matches(&record));

        let next = NaiveDate::from_ymd_opt(2025, 3, 11);
        let next_day = FilterState::new().with_date_range(next, next);
        assert!(!PredicateSet::from_state(&next_day, now(), brt()).matches(&record));
    }

    #[test]
    fn period_keeps_only_recent_records() {
        let state = FilterState::new().with_period(Some(Period::Week));
        let predicates = PredicateSet::from_state(&state, now(), utc());
        assert!(predicates.matches(&occurrence(1, 1, "x", 15)));
        assert!(!predicates.matches(&occurrence(2, 1, "x", 12)));
    }

    #[test]
    fn period_parses_english_and_portuguese() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("Mês".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("trimestre".parse::<Period>().unwrap(), Period::Quarter);
        assert!("decade".parse::<Period>().is_err());
    }

    #[test]
    fn query_searches_documented_log_fields() {
        let entry = log("1", "Maria Alves", LogAction::Login, "10.0.1.12");
        let by_user = PredicateSet::from_state(&FilterState::new().with_query("maria"), now(), utc());
        let by_ip = PredicateSet::from_state(&FilterState::new().with_query("10.0.1"), now(), utc());
        let by_module = PredicateSet::from_state(&FilterState::new().with_query("SISTEMA"), now(), utc());
        let miss = PredicateSet::from_state(&FilterState::new().with_query("roberto"), now(), utc());

        assert!(by_user.matches(&entry));
        assert!(by_ip.matches(&entry));
        assert!(by_module.matches(&entry));
        assert!(!miss.matches(&entry));
    }

    #[test]
    fn action_filter_accepts_english_alias() {
        let state = FilterState::new().with_field(Field::Action, "edited");
        let predicates = PredicateSet::from_state(&state, now(), utc());
        assert!(predicates.matches(&log("1", "Ana", LogAction::Edited, "10.0.0.1")));
        assert!(!predicates.matches(&log("2", "Ana", LogAction::Login, "10.0.0.1")));
    }

    #[test]
    fn filter_on_missing_dimension_excludes_record() {
        let state = FilterState::new().with_field(Field::User, "Ana");
        let predicates = PredicateSet::from_state(&state, now(), utc());
        assert!(!predicates.matches(&occurrence(1, 1, "x", 1)));
    }

    #[test]
    fn criteria_order_does_not_change_result() {
        let state = FilterState::new()
            .with_field(Field::Type, "incendio")
            .with_field(Field::Region, "regiao metropolitana")
            .with_query("detalhes");
        let predicates = PredicateSet::from_state(&state, now(), utc());
        let record = occurrence(1, 1, "Incêndio", 1);

        let forward = predicates.criteria().iter().all(|c| c.eval(&record));
        let backward = predicates.criteria().iter().rev().all(|c| c.eval(&record));
        assert!(forward);
        assert_eq!(forward, backward);
    }
}
