//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every alerta view, regardless of the client in use.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Supplies the ambient inputs** commands take explicitly: the type
//!   catalog, the display offset, the page size and the current time
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Terminal I/O**: no stdout, stderr, or file writing. Exports come back
//!   as [`crate::export::ExportFile`] values for the client to save.
//!
//! ## Generic Over RecordSource
//!
//! `AlertaApi<S: RecordSource>` is generic over where records come from:
//! - Production: `AlertaApi<HttpSource>` or `AlertaApi<FileSource>`
//! - Testing and demo mode: `AlertaApi<MemorySource>`

use crate::catalog::TypeCatalog;
use crate::commands;
use crate::config::AlertaConfig;
use crate::error::Result;
use crate::filter::FilterState;
use crate::pager::PageState;
use crate::source::RecordSource;
use chrono::{FixedOffset, Utc};
use std::path::{Path, PathBuf};

/// The main API facade for alerta views.
///
/// All UI clients (CLI, web, etc.) should interact through this API.
pub struct AlertaApi<S: RecordSource> {
    source: S,
    catalog: TypeCatalog,
    offset: FixedOffset,
    page_size: usize,
    config_dir: PathBuf,
}

impl<S: RecordSource> AlertaApi<S> {
    pub fn new(source: S, config: &AlertaConfig, config_dir: PathBuf) -> Self {
        Self {
            source,
            catalog: TypeCatalog::default(),
            offset: config.offset(),
            page_size: config.page_size,
            config_dir,
        }
    }

    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn home(&self, state: &FilterState) -> Result<commands::CmdResult> {
        commands::home::run(&self.source, &self.catalog, state, Utc::now(), self.offset)
    }

    pub fn list_occurrences(&self, state: &FilterState, page: usize) -> Result<commands::CmdResult> {
        commands::occurrences::list(
            &self.source,
            &self.catalog,
            state,
            self.page(page),
            Utc::now(),
            self.offset,
        )
    }

    pub fn show_occurrence(&self, id: u64) -> Result<commands::CmdResult> {
        commands::occurrences::show(&self.source, &self.catalog, id)
    }

    pub fn audit(&self, state: &FilterState, page: usize) -> Result<commands::CmdResult> {
        commands::audit::run(&self.source, state, self.page(page), Utc::now(), self.offset)
    }

    pub fn dashboard(&self, state: &FilterState, year: Option<i32>) -> Result<commands::CmdResult> {
        commands::dashboard::run(
            &self.source,
            &self.catalog,
            state,
            year,
            Utc::now(),
            self.offset,
        )
    }

    pub fn register(&mut self, form: &RegistrationForm) -> Result<commands::CmdResult> {
        commands::register::run(&mut self.source, &self.catalog, form, self.offset)
    }

    pub fn export_audit(&self, state: &FilterState) -> Result<commands::CmdResult> {
        commands::export::audit(&self.source, state, self.offset, Utc::now())
    }

    pub fn export_log(&self, id: &str) -> Result<commands::CmdResult> {
        commands::export::single_log(&self.source, id, self.offset)
    }

    pub fn export_occurrences(&self, state: &FilterState) -> Result<commands::CmdResult> {
        commands::export::occurrences(&self.source, &self.catalog, state, self.offset, Utc::now())
    }

    pub fn types(&self, key: Option<&str>) -> Result<commands::CmdResult> {
        commands::types::run(&self.catalog, key)
    }

    pub fn profile(&self) -> Result<commands::CmdResult> {
        commands::profile::run(&self.source)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn page(&self, number: usize) -> PageState {
        PageState::new(self.page_size).at(number)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::register::RegistrationForm;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use tempfile::tempdir;

    fn api(page_size: usize) -> AlertaApi<MemorySource> {
        let config = AlertaConfig {
            page_size,
            ..AlertaConfig::default()
        };
        AlertaApi::new(
            MemorySource::sample(Utc::now()),
            &config,
            PathBuf::from("unused"),
        )
    }

    #[test]
    fn page_size_comes_from_config() {
        let result = api(50).audit(&FilterState::new(), 1).unwrap();
        assert_eq!(result.logs.len(), 50);
        assert_eq!(result.page.unwrap().total_pages, 3);
    }

    #[test]
    fn register_goes_to_the_source() {
        let mut api = api(20);
        let form = RegistrationForm {
            kind: "3".to_string(),
            location: "Praça do Carmo".to_string(),
            date: "2025-03-10".to_string(),
            time: "08:00".to_string(),
            team: "1 GBM".to_string(),
            ..RegistrationForm::default()
        };
        let result = api.register(&form).unwrap();
        let id = result.occurrences[0].id;
        assert_eq!(api.show_occurrence(id).unwrap().occurrences[0].type_name, "APH");
    }

    #[test]
    fn config_uses_the_config_dir() {
        let dir = tempdir().unwrap();
        let api = AlertaApi::new(
            MemorySource::new(),
            &AlertaConfig::default(),
            dir.path().to_path_buf(),
        );
        api.config(ConfigAction::Set("logs-path".to_string(), "audit/all".to_string()))
            .unwrap();
        assert_eq!(AlertaConfig::load(dir.path()).unwrap().logs_path, "audit/all");
    }
}
