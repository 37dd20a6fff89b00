use crate::filter::fold_key;
use chrono::{DateTime, Utc};
use std::fmt;

/// Lifecycle state of an occurrence. Closed set: raw values that do not map
/// onto one of these are rejected by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusCategory {
    Open,
    InProgress,
    Closed,
    Cancelled,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 4] = [
        StatusCategory::Open,
        StatusCategory::InProgress,
        StatusCategory::Closed,
        StatusCategory::Cancelled,
    ];

    /// Maps a raw upstream status onto the closed enumeration.
    ///
    /// Matching is case, accent and separator insensitive, so `Em_andamento`,
    /// `EM ANDAMENTO` and `em-andamento` are the same value.
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_key(raw).as_str() {
            "aberta" | "aberto" | "pendente" | "open" => Some(StatusCategory::Open),
            "em-andamento" | "andamento" | "in-progress" | "inprogress" => {
                Some(StatusCategory::InProgress)
            }
            "encerrada" | "encerrado" | "finalizada" | "finalizado" | "concluida" | "closed" => {
                Some(StatusCategory::Closed)
            }
            "cancelada" | "cancelado" | "cancelled" | "canceled" => Some(StatusCategory::Cancelled),
            _ => None,
        }
    }

    /// Stable filter key, already folded.
    pub fn key(&self) -> &'static str {
        match self {
            StatusCategory::Open => "aberta",
            StatusCategory::InProgress => "em-andamento",
            StatusCategory::Closed => "encerrada",
            StatusCategory::Cancelled => "cancelada",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::Open => "ABERTA",
            StatusCategory::InProgress => "EM ANDAMENTO",
            StatusCategory::Closed => "FINALIZADA",
            StatusCategory::Cancelled => "CANCELADA",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match fold_key(raw).as_str() {
            "baixa" | "low" => Some(Priority::Low),
            "media" | "medium" => Some(Priority::Medium),
            "alta" | "high" => Some(Priority::High),
            "critica" | "urgente" | "critical" => Some(Priority::Critical),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
            Priority::Critical => "Crítica",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogAction {
    Login,
    Logout,
    Edited,
    Deleted,
    Created,
}

impl LogAction {
    pub const ALL: [LogAction; 5] = [
        LogAction::Login,
        LogAction::Logout,
        LogAction::Edited,
        LogAction::Deleted,
        LogAction::Created,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match fold_key(raw).as_str() {
            "login" => Some(LogAction::Login),
            "logout" => Some(LogAction::Logout),
            "editou" | "edited" | "edit" => Some(LogAction::Edited),
            "excluiu" | "deleted" | "delete" => Some(LogAction::Deleted),
            "criou" | "created" | "create" => Some(LogAction::Created),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogAction::Login => "Login",
            LogAction::Logout => "Logout",
            LogAction::Edited => "Editou",
            LogAction::Deleted => "Excluiu",
            LogAction::Created => "Criou",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogModule {
    System,
    Occurrences,
    Dashboard,
    Users,
}

impl LogModule {
    pub const ALL: [LogModule; 4] = [
        LogModule::System,
        LogModule::Occurrences,
        LogModule::Dashboard,
        LogModule::Users,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match fold_key(raw).as_str() {
            "sistema" | "system" => Some(LogModule::System),
            "ocorrencias" | "occurrences" => Some(LogModule::Occurrences),
            "dashboard" => Some(LogModule::Dashboard),
            "usuarios" | "users" => Some(LogModule::Users),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogModule::System => "Sistema",
            LogModule::Occurrences => "Ocorrências",
            LogModule::Dashboard => "Dashboard",
            LogModule::Users => "Usuários",
        }
    }
}

impl fmt::Display for LogModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A normalized occurrence. Only the normalizer builds these, so every
/// field already satisfies the closed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub status: StatusCategory,
    pub type_id: Option<u32>,
    pub type_name: String,
    pub type_description: String,
    pub priority: Priority,
    pub title: String,
    pub subtype: Option<String>,
    pub victims: Option<String>,
    pub details: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub team: Option<String>,
}

/// A validated registration, not yet accepted by any source.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceDraft {
    pub type_id: u32,
    pub type_name: String,
    pub subtype: Option<String>,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub victims: Option<String>,
    pub details: Option<String>,
    pub team: String,
}

/// A normalized audit trail entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: LogAction,
    pub module: LogModule,
    pub description: String,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub battalion: String,
    pub registry: String,
    pub phone: String,
    pub email: String,
    pub cpf: String,
}
