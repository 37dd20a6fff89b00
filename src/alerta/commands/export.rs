use crate::catalog::TypeCatalog;
use crate::commands::{load_logs, load_occurrences, CmdMessage, CmdResult};
use crate::error::{AlertaError, Result};
use crate::export::{
    export_delimited, export_filename, log_columns, occurrence_columns, single_log_filename,
    ExportFile,
};
use crate::filter::{FilterState, PredicateSet};
use crate::pipeline::filter;
use crate::source::RecordSource;
use chrono::{DateTime, FixedOffset, Utc};

const AUDIT_DOMAIN: &str = "auditoria";
const OCCURRENCE_DOMAIN: &str = "ocorrencias";

/// Every filtered audit entry, not just the visible page.
pub fn audit<S: RecordSource>(
    source: &S,
    state: &FilterState,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let logs = load_logs(source, &mut result)?;
    let rows = filter(&logs, &PredicateSet::from_state(state, now, offset));

    let content = export_delimited(&rows, &log_columns(offset))?;
    let filename = export_filename(AUDIT_DOMAIN, now.with_timezone(&offset).date_naive());
    result.add_message(CmdMessage::info(format!("{} log entries exported.", rows.len())));
    Ok(result.with_export(ExportFile::csv(filename, content)))
}

pub fn single_log<S: RecordSource>(source: &S, id: &str, offset: FixedOffset) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let logs = load_logs(source, &mut result)?;
    let entry = logs
        .into_iter()
        .find(|l| l.id == id)
        .ok_or_else(|| AlertaError::NotFound(format!("log entry {}", id)))?;

    let content = export_delimited(std::slice::from_ref(&entry), &log_columns(offset))?;
    Ok(result.with_export(ExportFile::csv(single_log_filename(&entry.id), content)))
}

pub fn occurrences<S: RecordSource>(
    source: &S,
    catalog: &TypeCatalog,
    state: &FilterState,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let occurrences = load_occurrences(source, catalog, &mut result)?;
    let rows = filter(&occurrences, &PredicateSet::from_state(state, now, offset));

    let content = export_delimited(&rows, &occurrence_columns(offset))?;
    let filename = export_filename(OCCURRENCE_DOMAIN, now.with_timezone(&offset).date_naive());
    result.add_message(CmdMessage::info(format!("{} occurrences exported.", rows.len())));
    Ok(result.with_export(ExportFile::csv(filename, content)))
}
