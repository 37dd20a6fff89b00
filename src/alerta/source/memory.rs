use super::{next_id, RecordSource};
use crate::error::Result;
use crate::model::OccurrenceDraft;
use crate::normalize::{RawLogEntry, RawOccurrence, RawProfile};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

const SAMPLE_LOG_COUNT: usize = 120;
const SAMPLE_LOG_SPACING_MINUTES: i64 = 7;
const SAMPLE_USERS: [&str; 4] = ["João Silva", "Maria Alves", "Roberto Silva", "Ana Beatriz"];
const SAMPLE_ACTIONS: [&str; 5] = ["Login", "Logout", "Editou", "Excluiu", "Criou"];
const SAMPLE_MODULES: [&str; 4] = ["Sistema", "Ocorrências", "Dashboard", "Usuários"];

/// In-memory records. Used by tests and by the `--mock` demo mode.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    occurrences: Vec<RawOccurrence>,
    logs: Vec<RawLogEntry>,
    profile: RawProfile,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_occurrences(mut self, occurrences: Vec<RawOccurrence>) -> Self {
        self.occurrences = occurrences;
        self
    }

    pub fn with_logs(mut self, logs: Vec<RawLogEntry>) -> Self {
        self.logs = logs;
        self
    }

    pub fn with_profile(mut self, profile: RawProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Demo data relative to `now`: 120 audit entries seven minutes apart,
    /// a dozen occurrences over the last weeks, and a dispatcher profile.
    pub fn sample(now: DateTime<Utc>) -> Self {
        Self {
            occurrences: sample_occurrences(now),
            logs: sample_logs(now),
            profile: RawProfile {
                name: Some("Roberto Silva".to_string()),
                role: Some("Despachante".to_string()),
                battalion: Some("1º GBM".to_string()),
                registry: Some("123.456-7".to_string()),
                phone: Some("(81) 99999-0000".to_string()),
                email: Some("roberto.silva@alertaconecta.gov.br".to_string()),
                cpf: Some("123.456.789-00".to_string()),
            },
        }
    }
}

fn iso(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn sample_logs(now: DateTime<Utc>) -> Vec<RawLogEntry> {
    (0..SAMPLE_LOG_COUNT)
        .map(|i| {
            let description = if i % 5 == 0 {
                "Alterou status para 'Atendida'"
            } else if i % 3 == 0 {
                "Incluiu novo registro"
            } else {
                "Acesso ao painel operacional"
            };
            RawLogEntry {
                id: Some((i + 1).to_string()),
                timestamp: Some(iso(
                    now - Duration::minutes(i as i64 * SAMPLE_LOG_SPACING_MINUTES),
                )),
                user: Some(SAMPLE_USERS[i % SAMPLE_USERS.len()].to_string()),
                action: Some(SAMPLE_ACTIONS[i % SAMPLE_ACTIONS.len()].to_string()),
                module: Some(SAMPLE_MODULES[i % SAMPLE_MODULES.len()].to_string()),
                description: Some(description.to_string()),
                ip: Some(format!("10.0.{}.{}", i / 10, i % 10 + 10)),
            }
        })
        .collect()
}

fn sample_occurrences(now: DateTime<Utc>) -> Vec<RawOccurrence> {
    // (hours ago, status, type, priority, title, region)
    let rows: [(i64, &str, u32, &str, &str, &str); 12] = [
        (1, "Em_andamento", 1, "Crítica", "Incêndio em galpão industrial", "Recife"),
        (3, "Aberta", 2, "Alta", "Colisão na BR-232", "Jaboatão"),
        (5, "Em_andamento", 3, "Média", "Queda de idoso em residência", "Olinda"),
        (9, "Encerrada", 1, "Alta", "Fogo em vegetação às margens da rodovia", "Recife"),
        (20, "Encerrada", 4, "Baixa", "Vistoria em casa de shows", "Recife"),
        (30, "Cancelada", 2, "Média", "Trote: pessoa presa em elevador", "Paulista"),
        (50, "Encerrada", 5, "Média", "Captura de serpente", "Camaragibe"),
        (80, "Em_andamento", 7, "Crítica", "Deslizamento de barreira", "Jaboatão"),
        (120, "Encerrada", 3, "Alta", "Atendimento a vítima de afogamento", "Olinda"),
        (200, "Aberta", 6, "Baixa", "Apoio administrativo a evento", "Recife"),
        (400, "Encerrada", 1, "Média", "Incêndio veicular", "Paulista"),
        (900, "Cancelada", 7, "Alta", "Alagamento em via pública", "Recife"),
    ];

    rows.iter()
        .enumerate()
        .map(
            |(i, (hours_ago, status, type_id, priority, title, region))| RawOccurrence {
                id: Some(rows.len() as u64 - i as u64),
                status: Some(status.to_string()),
                type_id: Some(*type_id),
                priority: Some(priority.to_string()),
                date: Some(iso(now - Duration::hours(*hours_ago))),
                titule: Some(title.to_string()),
                details: Some(format!("{}. Equipe acionada pela central.", title)),
                region: Some(region.to_string()),
                team: Some(format!("{} GBM", i % 3 + 1)),
                ..RawOccurrence::default()
            },
        )
        .collect()
}

impl RecordSource for MemorySource {
    fn fetch_occurrences(&self) -> Result<Vec<RawOccurrence>> {
        Ok(self.occurrences.clone())
    }

    fn fetch_logs(&self) -> Result<Vec<RawLogEntry>> {
        Ok(self.logs.clone())
    }

    fn fetch_profile(&self) -> Result<RawProfile> {
        Ok(self.profile.clone())
    }

    fn submit_occurrence(&mut self, draft: &OccurrenceDraft) -> Result<u64> {
        let id = next_id(&self.occurrences);
        self.occurrences
            .insert(0, RawOccurrence::from_draft(id, draft));
        Ok(id)
    }
}
