use crate::catalog::{OccurrenceType, TypeCatalog};
use crate::config::AlertaConfig;
use crate::error::Result;
use crate::export::ExportFile;
use crate::metrics::{AuditMetrics, DashboardMetrics};
use crate::model::{LogEntry, Occurrence, Profile, StatusCategory};
use crate::normalize::{normalize_logs, normalize_occurrences, Normalized, Rejection};
use crate::pager::PageInfo;
use crate::pipeline::Buckets;
use crate::source::RecordSource;

pub mod audit;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod home;
pub mod occurrences;
pub mod profile;
pub mod register;
pub mod types;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Everything a view needs to render. Each command fills only the parts its
/// view shows.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub feed: Option<Buckets<StatusCategory, Occurrence>>,
    pub occurrences: Vec<Occurrence>,
    pub latest: Vec<Occurrence>,
    pub logs: Vec<LogEntry>,
    pub page: Option<PageInfo>,
    pub audit_metrics: Option<AuditMetrics>,
    pub dashboard: Option<DashboardMetrics>,
    pub monthly: Option<(i32, [usize; 12])>,
    pub users: Vec<String>,
    pub types: Vec<OccurrenceType>,
    pub profile: Option<Profile>,
    pub export: Option<ExportFile>,
    pub config: Option<AlertaConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_feed(mut self, feed: Buckets<StatusCategory, Occurrence>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn with_occurrences(mut self, occurrences: Vec<Occurrence>) -> Self {
        self.occurrences = occurrences;
        self
    }

    pub fn with_logs(mut self, logs: Vec<LogEntry>) -> Self {
        self.logs = logs;
        self
    }

    pub fn with_page(mut self, page: PageInfo) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_export(mut self, export: ExportFile) -> Self {
        self.export = Some(export);
        self
    }

    pub fn with_config(mut self, config: AlertaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Records skipped by the normalizer, surfaced as warnings.
    fn add_rejections(&mut self, rejections: &[Rejection]) {
        for rejection in rejections {
            self.add_message(CmdMessage::warning(rejection.to_string()));
        }
    }
}

/// Fetches and normalizes the occurrence snapshot; rejected records become
/// warnings on `result`.
pub(crate) fn load_occurrences<S: RecordSource>(
    source: &S,
    catalog: &TypeCatalog,
    result: &mut CmdResult,
) -> Result<Vec<Occurrence>> {
    let raws = source.fetch_occurrences()?;
    let Normalized {
        records,
        rejections,
    } = normalize_occurrences(&raws, catalog);
    result.add_rejections(&rejections);
    Ok(records)
}

pub(crate) fn load_logs<S: RecordSource>(source: &S, result: &mut CmdResult) -> Result<Vec<LogEntry>> {
    let raws = source.fetch_logs()?;
    let Normalized {
        records,
        rejections,
    } = normalize_logs(&raws);
    result.add_rejections(&rejections);
    Ok(records)
}
