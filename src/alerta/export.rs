//! # Tabular Exporter
//!
//! Serializes records into the semicolon-delimited text the dispatch center
//! opens in spreadsheets. The format is fixed:
//!
//! - `;` between fields, header row first, every row (the last one
//!   included) terminated by `\n`
//! - every field, headers included, wrapped in double quotes
//! - inside a field: `"` is doubled, `;` becomes `,`, line breaks become a
//!   single space
//! - a missing value is an empty quoted field
//!
//! Quoting is done by the `csv` writer; only the `;` and line-break
//! flattening happens here. Writing the result somewhere is the caller's
//! business; see [`ExportFile`].

use crate::error::{AlertaError, Result};
use crate::model::{LogEntry, Occurrence};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

pub const CSV_MIME: &str = "text/csv;charset=utf-8";

const SEPARATOR: char = ';';
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

type Extract<R> = Box<dyn Fn(&R) -> Option<String>>;

/// One output column: a header and how to pull the value out of a record.
pub struct Column<R> {
    pub header: String,
    extract: Extract<R>,
}

impl<R> Column<R> {
    pub fn new(header: impl Into<String>, extract: impl Fn(&R) -> Option<String> + 'static) -> Self {
        Self {
            header: header.into(),
            extract: Box::new(extract),
        }
    }

    pub fn value(&self, record: &R) -> Option<String> {
        (self.extract)(record)
    }
}

/// A finished export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

impl ExportFile {
    pub fn csv(filename: String, content: String) -> Self {
        Self {
            filename,
            mime: CSV_MIME,
            content,
        }
    }
}

pub fn export_delimited<R>(records: &[R], columns: &[Column<R>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| flatten(&c.header)))
        .map_err(|e| AlertaError::Csv("header", e))?;
    for record in records {
        writer
            .write_record(
                columns
                    .iter()
                    .map(|c| flatten(&c.value(record).unwrap_or_default())),
            )
            .map_err(|e| AlertaError::Csv("row", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AlertaError::Csv("flush", e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|e| AlertaError::Source(e.to_string()))
}

/// `;` would split the field in spreadsheets that ignore quoting, and line
/// breaks would split the row.
fn flatten(field: &str) -> String {
    field
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace(SEPARATOR, ",")
}

fn display_time(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format(DISPLAY_FORMAT)
        .to_string()
}

/// Audit log columns. Timestamps are rendered at `offset`.
pub fn log_columns(offset: FixedOffset) -> Vec<Column<LogEntry>> {
    vec![
        Column::new("Data/Hora", move |l: &LogEntry| {
            Some(display_time(l.timestamp, offset))
        }),
        Column::new("Usuário", |l: &LogEntry| Some(l.user.clone())),
        Column::new("Ação", |l: &LogEntry| Some(l.action.label().to_string())),
        Column::new("Módulo", |l: &LogEntry| Some(l.module.label().to_string())),
        Column::new("Descrição", |l: &LogEntry| Some(l.description.clone())),
        Column::new("IP/Origem", |l: &LogEntry| Some(l.ip.clone())),
    ]
}

pub fn occurrence_columns(offset: FixedOffset) -> Vec<Column<Occurrence>> {
    vec![
        Column::new("ID", |o: &Occurrence| Some(o.id.to_string())),
        Column::new("Data/Hora", move |o: &Occurrence| {
            Some(display_time(o.timestamp, offset))
        }),
        Column::new("Título", |o: &Occurrence| Some(o.title.clone())),
        Column::new("Tipo", |o: &Occurrence| Some(o.type_name.clone())),
        Column::new("Status", |o: &Occurrence| Some(o.status.label().to_string())),
        Column::new("Prioridade", |o: &Occurrence| {
            Some(o.priority.label().to_string())
        }),
        Column::new("Envolvidos", |o: &Occurrence| o.victims.clone()),
        Column::new("Detalhes", |o: &Occurrence| o.details.clone()),
    ]
}

/// `{domain}-logs_{YYYY-MM-DD}.csv`
pub fn export_filename(domain: &str, date: NaiveDate) -> String {
    format!("{}-logs_{}.csv", domain, date.format("%Y-%m-%d"))
}

pub fn single_log_filename(id: &str) -> String {
    format!("log_{}.csv", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogAction, LogModule, Priority, StatusCategory};
    use chrono::TimeZone;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn log(id: &str, description: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 13, 5, 0).unwrap(),
            user: "Maria Alves".to_string(),
            action: LogAction::Edited,
            module: LogModule::Occurrences,
            description: description.to_string(),
            ip: "10.0.0.12".to_string(),
        }
    }

    #[test]
    fn header_row_comes_first_and_is_quoted() {
        let csv = export_delimited(&[] as &[LogEntry], &log_columns(brt())).unwrap();
        assert_eq!(
            csv,
            "\"Data/Hora\";\"Usuário\";\"Ação\";\"Módulo\";\"Descrição\";\"IP/Origem\"\n"
        );
    }

    #[test]
    fn quotes_separators_and_newlines_are_escaped() {
        let csv = export_delimited(
            &[log("1", "Alterou status para \"Atendida\"; motivo:\nfim")],
            &log_columns(brt()),
        )
        .unwrap();
        assert!(csv.ends_with('\n'));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\"10/03/2025 10:05\";\"Maria Alves\";\"Editou\";\"Ocorrências\";\
             \"Alterou status para \"\"Atendida\"\", motivo: fim\";\"10.0.0.12\""
        );
    }

    #[test]
    fn exported_fields_parse_back_to_escaped_values() {
        let entries = vec![
            log("1", "Incluiu novo registro"),
            log("2", "Texto com \"aspas\" e ; ponto e vírgula"),
            log("3", "linha1\r\nlinha2"),
        ];
        let columns = log_columns(brt());
        let content = export_delimited(&entries, &columns).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(content.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), entries.len());

        for (entry, fields) in entries.iter().zip(&rows) {
            assert_eq!(fields.len(), columns.len());
            for (column, field) in columns.iter().zip(fields.iter()) {
                let expected = column
                    .value(entry)
                    .unwrap_or_default()
                    .replace(';', ",")
                    .replace("\r\n", " ")
                    .replace('\n', " ");
                assert_eq!(field, expected);
            }
        }
    }

    #[test]
    fn missing_values_are_empty_fields() {
        let occurrence = Occurrence {
            id: 9,
            timestamp: Utc.with_ymd_and_hms(2025, 1, 2, 3, 0, 0).unwrap(),
            status: StatusCategory::Cancelled,
            type_id: Some(2),
            type_name: "Resgate".to_string(),
            type_description: "Sem descrição".to_string(),
            priority: Priority::Low,
            title: "Ocorrência #9".to_string(),
            subtype: None,
            victims: None,
            details: None,
            region: None,
            address: None,
            team: None,
        };
        let csv = export_delimited(&[occurrence], &occurrence_columns(brt())).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"9\";\"02/01/2025 00:00\";\"Ocorrência #9\";\"Resgate\";\"CANCELADA\";\"Baixa\";\"\";\"\""
        );
    }

    #[test]
    fn filenames_follow_the_download_convention() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            export_filename("auditoria", date),
            "auditoria-logs_2025-03-10.csv"
        );
        assert_eq!(single_log_filename("42"), "log_42.csv");
        assert_eq!(
            ExportFile::csv("a.csv".to_string(), String::new()).mime,
            "text/csv;charset=utf-8"
        );
    }
}
