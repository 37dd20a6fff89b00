//! Occurrence registration form.
//!
//! The form is validated in full before anything is submitted: the type and
//! subtype go through the [`SubtypeSelector`], so a subtype that does not
//! belong to the chosen type can never reach the source.

use crate::catalog::TypeCatalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{AlertaError, Result};
use crate::filter::fold_key;
use crate::model::OccurrenceDraft;
use crate::normalize::{non_blank, normalize_occurrence, RawOccurrence};
use crate::selector::SubtypeSelector;
use crate::source::RecordSource;
use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

pub const TEAMS: [&str; 3] = ["1 GBM", "2 GBM", "3 GBM"];

/// Raw form input, as typed by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Type id or name
    pub kind: String,
    /// Subtype id or label; the type's first subtype when absent
    pub subtype: Option<String>,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub victims: Option<String>,
    pub details: Option<String>,
    pub team: String,
}

pub fn validate(
    form: &RegistrationForm,
    catalog: &TypeCatalog,
    offset: FixedOffset,
) -> Result<OccurrenceDraft> {
    let kind = catalog.find(&form.kind).ok_or_else(|| {
        AlertaError::InvalidForm(format!("unknown occurrence type '{}'", form.kind))
    })?;

    let mut selector = SubtypeSelector::new(catalog);
    selector.on_type_change(kind.id)?;
    if let Some(subtype) = form.subtype.as_deref().filter(|s| !s.trim().is_empty()) {
        let accepted = match subtype.trim().parse::<u32>() {
            Ok(id) => selector.select_subtype(id),
            Err(_) => selector.select_subtype_label(subtype),
        };
        if !accepted {
            return Err(AlertaError::InvalidForm(format!(
                "'{}' is not a subtype of {}",
                subtype, kind.name
            )));
        }
    }

    let location = form.location.trim();
    if location.is_empty() {
        return Err(AlertaError::InvalidForm("location is required".to_string()));
    }

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d").map_err(|_| {
        AlertaError::InvalidForm(format!("invalid date '{}', expected YYYY-MM-DD", form.date))
    })?;
    let time = NaiveTime::parse_from_str(form.time.trim(), "%H:%M").map_err(|_| {
        AlertaError::InvalidForm(format!("invalid time '{}', expected HH:MM", form.time))
    })?;
    let timestamp = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| AlertaError::InvalidForm("date and time do not exist".to_string()))?
        .with_timezone(&Utc);

    let team = parse_team(&form.team).ok_or_else(|| {
        AlertaError::InvalidForm(format!(
            "invalid team '{}', expected one of {}",
            form.team,
            TEAMS.join(", ")
        ))
    })?;

    Ok(OccurrenceDraft {
        type_id: kind.id,
        type_name: kind.name.clone(),
        subtype: selector.selected_subtype().map(|s| s.label.clone()),
        location: location.to_string(),
        timestamp,
        victims: non_blank(&form.victims),
        details: non_blank(&form.details),
        team: team.to_string(),
    })
}

pub fn run<S: RecordSource>(
    source: &mut S,
    catalog: &TypeCatalog,
    form: &RegistrationForm,
    offset: FixedOffset,
) -> Result<CmdResult> {
    let draft = validate(form, catalog, offset)?;
    let id = source.submit_occurrence(&draft)?;

    let mut result = CmdResult::default();
    match normalize_occurrence(&RawOccurrence::from_draft(id, &draft), catalog) {
        Ok(occurrence) => result.occurrences.push(occurrence),
        Err(rejection) => result.add_message(CmdMessage::warning(rejection.to_string())),
    }
    result.add_message(CmdMessage::success(format!("Occurrence #{} registered.", id)));
    Ok(result)
}

/// Accepts `2`, `2 GBM`, `2gbm` or `2º GBM`.
fn parse_team(input: &str) -> Option<&'static str> {
    let key = fold_key(input).replace(['º', '°'], "");
    let number = key.strip_suffix("gbm").unwrap_or(&key).trim_end_matches('-');
    TEAMS
        .iter()
        .copied()
        .find(|team| team.split(' ').next() == Some(number))
}
