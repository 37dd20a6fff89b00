//! # Entity Normalizer
//!
//! The single boundary where loosely shaped upstream JSON becomes the closed
//! schema of [`crate::model`]. Everything downstream assumes normalized
//! records, so this is the only module that deals with missing fields,
//! alternate field names and unknown enumeration values.
//!
//! Missing optional fields get fallbacks and never fail. A record is
//! **rejected** only when no honest value can be given to a field the
//! pipeline keys on: id, status, timestamp, or the action/module of a log
//! entry. Rejections are logged and returned next to the accepted records so
//! the caller can surface them.

use crate::catalog::TypeCatalog;
use crate::model::{
    LogAction, LogEntry, LogModule, Occurrence, OccurrenceDraft, Priority, Profile,
    StatusCategory,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

const DEFAULT_TYPE_DESCRIPTION: &str = "Sem descrição";
const MISSING_TYPE_NAME: &str = "Sem tipo";
const UNKNOWN_USER: &str = "Desconhecido";
const NOT_INFORMED: &str = "Não informado";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// An occurrence as the upstream API (or a local file) sends it.
///
/// Accepts both the API field names and the mapped names used by the
/// details view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOccurrence {
    #[serde(
        default,
        alias = "id_ocorrencia",
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    #[serde(default, alias = "status_atual")]
    pub status: Option<String>,
    #[serde(
        default,
        rename = "type",
        alias = "id_tipo_ocorrencia",
        deserialize_with = "lenient_u32"
    )]
    pub type_id: Option<u32>,
    #[serde(default, alias = "prioridade")]
    pub priority: Option<String>,
    #[serde(default, alias = "data_hora")]
    pub date: Option<String>,
    #[serde(default, alias = "titulo", alias = "title")]
    pub titule: Option<String>,
    #[serde(default, alias = "grupo", alias = "subtipo")]
    pub subtype: Option<String>,
    #[serde(default, alias = "envolvidos")]
    pub victims: Option<String>,
    #[serde(default, alias = "detalhes")]
    pub details: Option<String>,
    #[serde(default)]
    pub nome_tipo: Option<String>,
    #[serde(default)]
    pub descricao_tipo: Option<String>,
    #[serde(default, alias = "regiao")]
    pub region: Option<String>,
    #[serde(default, alias = "endereco", alias = "local")]
    pub address: Option<String>,
    #[serde(default, alias = "equipe")]
    pub team: Option<String>,
}

impl RawOccurrence {
    /// Raw form of a registration, stored by sources that keep raw records.
    pub fn from_draft(id: u64, draft: &OccurrenceDraft) -> Self {
        Self {
            id: Some(id),
            status: Some("Aberta".to_string()),
            type_id: Some(draft.type_id),
            priority: None,
            date: Some(draft.timestamp.to_rfc3339()),
            titule: draft.subtype.clone(),
            subtype: draft.subtype.clone(),
            victims: draft.victims.clone(),
            details: draft.details.clone(),
            nome_tipo: Some(draft.type_name.clone()),
            descricao_tipo: None,
            region: None,
            address: Some(draft.location.clone()),
            team: Some(draft.team.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, alias = "data_hora")]
    pub timestamp: Option<String>,
    #[serde(default, alias = "usuario")]
    pub user: Option<String>,
    #[serde(default, alias = "acao")]
    pub action: Option<String>,
    #[serde(default, alias = "modulo")]
    pub module: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "origem")]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default, alias = "cargo")]
    pub role: Option<String>,
    #[serde(default, alias = "batalhao")]
    pub battalion: Option<String>,
    #[serde(default, alias = "matricula")]
    pub registry: Option<String>,
    #[serde(default, alias = "telefone")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("missing id")]
    MissingId,
    #[error("duplicate id")]
    DuplicateId,
    #[error("missing status")]
    MissingStatus,
    #[error("unrecognized status '{0}'")]
    UnknownStatus(String),
    #[error("unparseable timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("unrecognized action '{0}'")]
    UnknownAction(String),
    #[error("unrecognized module '{0}'")]
    UnknownModule(String),
}

/// A raw record that was kept out of the canonical collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub id: Option<String>,
    pub reason: RejectReason,
}

impl Rejection {
    fn new(id: Option<String>, reason: RejectReason) -> Self {
        Self { id, reason }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "record {} skipped: {}", id, self.reason),
            None => write!(f, "record without id skipped: {}", self.reason),
        }
    }
}

/// Result of normalizing one fetched snapshot.
#[derive(Debug, Clone)]
pub struct Normalized<R> {
    pub records: Vec<R>,
    pub rejections: Vec<Rejection>,
}

pub fn normalize_occurrence(
    raw: &RawOccurrence,
    catalog: &TypeCatalog,
) -> Result<Occurrence, Rejection> {
    let id = raw
        .id
        .ok_or_else(|| Rejection::new(None, RejectReason::MissingId))?;
    let reject = |reason| Rejection::new(Some(id.to_string()), reason);

    let raw_status = non_blank(&raw.status).ok_or_else(|| reject(RejectReason::MissingStatus))?;
    let status = StatusCategory::parse(&raw_status)
        .ok_or_else(|| reject(RejectReason::UnknownStatus(raw_status.clone())))?;

    let raw_date = raw.date.clone().unwrap_or_default();
    let timestamp = parse_timestamp(&raw_date)
        .ok_or_else(|| reject(RejectReason::InvalidTimestamp(raw_date.clone())))?;

    let priority = match non_blank(&raw.priority) {
        None => Priority::Medium,
        Some(p) => Priority::parse(&p).unwrap_or_else(|| {
            tracing::warn!(id, priority = %p, "unrecognized priority, using Média");
            Priority::Medium
        }),
    };

    let type_name = match raw.type_id {
        Some(type_id) => match catalog.get(type_id) {
            Some(t) => t.name.clone(),
            None => non_blank(&raw.nome_tipo).unwrap_or_else(|| format!("Tipo {}", type_id)),
        },
        None => non_blank(&raw.nome_tipo).unwrap_or_else(|| MISSING_TYPE_NAME.to_string()),
    };

    Ok(Occurrence {
        id,
        timestamp,
        status,
        type_id: raw.type_id,
        type_name,
        type_description: non_blank(&raw.descricao_tipo)
            .unwrap_or_else(|| DEFAULT_TYPE_DESCRIPTION.to_string()),
        priority,
        title: non_blank(&raw.titule).unwrap_or_else(|| format!("Ocorrência #{}", id)),
        subtype: non_blank(&raw.subtype),
        victims: non_blank(&raw.victims),
        details: non_blank(&raw.details),
        region: non_blank(&raw.region),
        address: non_blank(&raw.address),
        team: non_blank(&raw.team),
    })
}

pub fn normalize_log(raw: &RawLogEntry) -> Result<LogEntry, Rejection> {
    let id = non_blank(&raw.id).ok_or_else(|| Rejection::new(None, RejectReason::MissingId))?;
    let reject = |reason| Rejection::new(Some(id.clone()), reason);

    let raw_ts = raw.timestamp.clone().unwrap_or_default();
    let timestamp = parse_timestamp(&raw_ts)
        .ok_or_else(|| reject(RejectReason::InvalidTimestamp(raw_ts.clone())))?;

    let raw_action = raw.action.clone().unwrap_or_default();
    let action = LogAction::parse(&raw_action)
        .ok_or_else(|| reject(RejectReason::UnknownAction(raw_action.clone())))?;

    let raw_module = raw.module.clone().unwrap_or_default();
    let module = LogModule::parse(&raw_module)
        .ok_or_else(|| reject(RejectReason::UnknownModule(raw_module.clone())))?;

    Ok(LogEntry {
        id: id.clone(),
        timestamp,
        user: non_blank(&raw.user).unwrap_or_else(|| UNKNOWN_USER.to_string()),
        action,
        module,
        description: raw.description.clone().unwrap_or_default(),
        ip: raw.ip.clone().unwrap_or_default(),
    })
}

/// Profiles have no keyed fields, so normalization always succeeds.
pub fn normalize_profile(raw: &RawProfile) -> Profile {
    let or_default = |v: &Option<String>| non_blank(v).unwrap_or_else(|| NOT_INFORMED.to_string());
    Profile {
        name: or_default(&raw.name),
        role: or_default(&raw.role),
        battalion: or_default(&raw.battalion),
        registry: or_default(&raw.registry),
        phone: or_default(&raw.phone),
        email: or_default(&raw.email),
        cpf: or_default(&raw.cpf),
    }
}

pub fn normalize_occurrences(raws: &[RawOccurrence], catalog: &TypeCatalog) -> Normalized<Occurrence> {
    normalize_batch(raws, |raw| normalize_occurrence(raw, catalog), |o| o.id.to_string())
}

pub fn normalize_logs(raws: &[RawLogEntry]) -> Normalized<LogEntry> {
    normalize_batch(raws, normalize_log, |l| l.id.clone())
}

/// Normalizes a snapshot in order. Ids must be unique within the snapshot;
/// later duplicates are rejected.
fn normalize_batch<Raw, R>(
    raws: &[Raw],
    normalize: impl Fn(&Raw) -> Result<R, Rejection>,
    id_of: impl Fn(&R) -> String,
) -> Normalized<R> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raws.len());
    let mut rejections = Vec::new();

    for raw in raws {
        let outcome = normalize(raw).and_then(|record| {
            let id = id_of(&record);
            if seen.insert(id.clone()) {
                Ok(record)
            } else {
                Err(Rejection::new(Some(id), RejectReason::DuplicateId))
            }
        });
        match outcome {
            Ok(record) => records.push(record),
            Err(rejection) => {
                tracing::warn!(%rejection, "data integrity warning");
                rejections.push(rejection);
            }
        }
    }

    Normalized {
        records,
        rejections,
    }
}

/// Parses RFC 3339, naive date-times (taken as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(lenient_u64(deserializer)?.and_then(|v| u32::try_from(v).ok()))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(id: u64, status: &str) -> RawOccurrence {
        RawOccurrence {
            id: Some(id),
            status: Some(status.to_string()),
            type_id: Some(1),
            priority: Some("Alta".to_string()),
            date: Some("2025-03-10T14:30:00Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn parses_api_payload_with_aliases() {
        let json = r#"[
            {"id": 7, "status": "Em_andamento", "type": 1, "priority": "Alta",
             "date": "2025-03-10 14:30:00", "titule": null, "victims": "2 vítimas",
             "details": "Fumaça no 3º andar"},
            {"id_ocorrencia": "8", "status_atual": "Encerrada", "id_tipo_ocorrencia": 2,
             "prioridade": "Baixa", "data_hora": "2025-03-11", "titulo": "Resgate na ponte"}
        ]"#;
        let raws: Vec<RawOccurrence> = serde_json::from_str(json).unwrap();
        let normalized = normalize_occurrences(&raws, &TypeCatalog::default());

        assert!(normalized.rejections.is_empty());
        let first = &normalized.records[0];
        assert_eq!(first.id, 7);
        assert_eq!(first.status, StatusCategory::InProgress);
        assert_eq!(first.title, "Ocorrência #7");
        assert_eq!(first.type_name, "Incêndio");
        assert_eq!(first.type_description, "Sem descrição");
        assert_eq!(
            first.timestamp,
            Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap()
        );

        let second = &normalized.records[1];
        assert_eq!(second.id, 8);
        assert_eq!(second.status, StatusCategory::Closed);
        assert_eq!(second.title, "Resgate na ponte");
        assert_eq!(second.priority, Priority::Low);
    }

    #[test]
    fn unknown_status_is_rejected_not_coerced() {
        let result = normalize_occurrence(&raw(1, "Atendida"), &TypeCatalog::default());
        let rejection = result.unwrap_err();
        assert_eq!(
            rejection.reason,
            RejectReason::UnknownStatus("Atendida".to_string())
        );
        assert_eq!(rejection.id.as_deref(), Some("1"));
    }

    #[test]
    fn missing_status_and_id_are_rejected() {
        let mut no_status = raw(1, "");
        no_status.status = None;
        assert_eq!(
            normalize_occurrence(&no_status, &TypeCatalog::default())
                .unwrap_err()
                .reason,
            RejectReason::MissingStatus
        );

        let mut no_id = raw(1, "Aberta");
        no_id.id = None;
        assert_eq!(
            normalize_occurrence(&no_id, &TypeCatalog::default())
                .unwrap_err()
                .reason,
            RejectReason::MissingId
        );
    }

    #[test]
    fn invalid_timestamp_is_rejected() {
        let mut bad = raw(3, "Aberta");
        bad.date = Some("ontem".to_string());
        let rejection = normalize_occurrence(&bad, &TypeCatalog::default()).unwrap_err();
        assert_eq!(
            rejection.reason,
            RejectReason::InvalidTimestamp("ontem".to_string())
        );
    }

    #[test]
    fn type_name_fallbacks() {
        let catalog = TypeCatalog::default();

        let mut unknown = raw(1, "Aberta");
        unknown.type_id = Some(99);
        assert_eq!(
            normalize_occurrence(&unknown, &catalog).unwrap().type_name,
            "Tipo 99"
        );

        unknown.nome_tipo = Some("Tipo Especial".to_string());
        assert_eq!(
            normalize_occurrence(&unknown, &catalog).unwrap().type_name,
            "Tipo Especial"
        );

        let mut missing = raw(2, "Aberta");
        missing.type_id = None;
        assert_eq!(
            normalize_occurrence(&missing, &catalog).unwrap().type_name,
            "Sem tipo"
        );
    }

    #[test]
    fn missing_priority_defaults_to_medium() {
        let mut r = raw(1, "Aberta");
        r.priority = None;
        assert_eq!(
            normalize_occurrence(&r, &TypeCatalog::default())
                .unwrap()
                .priority,
            Priority::Medium
        );
    }

    #[test]
    fn batch_keeps_order_and_drops_duplicates() {
        let raws = vec![
            raw(1, "Aberta"),
            raw(2, "Invalida"),
            raw(3, "Cancelada"),
            raw(1, "Encerrada"),
        ];
        let normalized = normalize_occurrences(&raws, &TypeCatalog::default());

        let ids: Vec<u64> = normalized.records.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(normalized.rejections.len(), 2);
        assert_eq!(normalized.rejections[1].reason, RejectReason::DuplicateId);
        assert_eq!(normalized.records[0].status, StatusCategory::Open);
    }

    #[test]
    fn log_entries_normalize_and_reject_unknown_actions() {
        let json = r#"[
            {"id": 1, "timestamp": "2025-03-10T10:00:00.000Z", "user": "João Silva",
             "action": "Login", "module": "Sistema", "description": "Acesso", "ip": "10.0.0.10"},
            {"id": "2", "timestamp": "2025-03-10T10:07:00Z", "user": "",
             "action": "Editou", "module": "Ocorrências"},
            {"id": "3", "timestamp": "2025-03-10T10:14:00Z", "user": "Ana",
             "action": "Imprimiu", "module": "Sistema"}
        ]"#;
        let raws: Vec<RawLogEntry> = serde_json::from_str(json).unwrap();
        let normalized = normalize_logs(&raws);

        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[0].id, "1");
        assert_eq!(normalized.records[1].user, "Desconhecido");
        assert_eq!(normalized.records[1].module, LogModule::Occurrences);
        assert_eq!(
            normalized.rejections[0].reason,
            RejectReason::UnknownAction("Imprimiu".to_string())
        );
    }

    #[test]
    fn profile_defaults_missing_fields() {
        let raw: RawProfile =
            serde_json::from_str(r#"{"nome": "Roberto Silva", "cargo": "Despachante"}"#).unwrap();
        let profile = normalize_profile(&raw);
        assert_eq!(profile.name, "Roberto Silva");
        assert_eq!(profile.role, "Despachante");
        assert_eq!(profile.email, "Não informado");
    }

    #[test]
    fn draft_round_trips_into_an_open_occurrence() {
        let draft = OccurrenceDraft {
            type_id: 1,
            type_name: "Incêndio".to_string(),
            subtype: Some("Incêndio Florestal".to_string()),
            location: "Rua das Flores, 100".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 9, 15, 0).unwrap(),
            victims: None,
            details: Some("Mata em chamas".to_string()),
            team: "2 GBM".to_string(),
        };
        let raw = RawOccurrence::from_draft(42, &draft);
        let occurrence = normalize_occurrence(&raw, &TypeCatalog::default()).unwrap();

        assert_eq!(occurrence.id, 42);
        assert_eq!(occurrence.status, StatusCategory::Open);
        assert_eq!(occurrence.title, "Incêndio Florestal");
        assert_eq!(occurrence.address.as_deref(), Some("Rua das Flores, 100"));
        assert_eq!(occurrence.team.as_deref(), Some("2 GBM"));
        assert_eq!(occurrence.timestamp, draft.timestamp);
    }
}
