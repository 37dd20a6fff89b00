//! # CLI Layer
//!
//! This module is **one possible UI client** for alerta. It is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Writes export files to disk
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Pick the record source and build the `AlertaApi`
//! 3. **API Dispatch**: Call the appropriate `AlertaApi` method
//! 4. **Output Formatting**: Convert `CmdResult` into terminal output
//! 5. **Error Handling**: Errors bubble up to `main.rs`, which prints them and exits 1
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_tracing()`: stderr diagnostics, filtered by `ALERTA_LOG`
//! - `execute()`: Generic over the record source chosen by the global flags
//! - `handle_*()`: Per-command handlers that call API and format output

use super::args::{Cli, Commands, ExportCommands, LogFilters, OccurrenceFilters};
use super::print::{
    print_audit, print_config, print_dashboard, print_feed, print_messages,
    print_occurrence_details, print_occurrence_list, print_profile, print_types,
};
use alerta::api::{AlertaApi, CmdResult, ConfigAction, RegistrationForm};
use alerta::config::{self, AlertaConfig};
use alerta::error::{AlertaError, Result};
use alerta::filter::{Field, FilterState};
use alerta::session::{Session, TOKEN_ENV};
use alerta::source::{FileSource, HttpSource, MemorySource, RecordSource};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ALERTA_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_dir = config::config_dir()?;
    let config = AlertaConfig::load(&config_dir)?;
    let command = cli.command.unwrap_or(Commands::Home {
        filters: OccurrenceFilters::default(),
    });

    if cli.mock {
        tracing::debug!("using sample records");
        let source = MemorySource::sample(Utc::now());
        execute(AlertaApi::new(source, &config, config_dir), command)
    } else if let Some(dir) = cli.data {
        tracing::debug!(dir = %dir.display(), "using file records");
        execute(AlertaApi::new(FileSource::new(dir), &config, config_dir), command)
    } else {
        let session = Session::resolve(std::env::var(TOKEN_ENV).ok(), &config);
        if !session.is_authenticated() {
            tracing::warn!("no session token, requests are anonymous");
        }
        let source = HttpSource::new(&config, session);
        execute(AlertaApi::new(source, &config, config_dir), command)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn execute<S: RecordSource>(mut api: AlertaApi<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Home { filters } => handle_home(&api, &filters),
        Commands::List { filters, page } => handle_list(&api, &filters, page),
        Commands::Show { id } => handle_show(&api, id),
        Commands::Audit { filters, page } => handle_audit(&api, &filters, page),
        Commands::Dashboard { filters, year } => handle_dashboard(&api, &filters, year),
        Commands::Register {
            kind,
            subtype,
            location,
            date,
            time,
            victims,
            details,
            team,
        } => {
            let form = RegistrationForm {
                kind,
                subtype,
                location,
                date,
                time,
                victims,
                details,
                team,
            };
            handle_register(&mut api, &form)
        }
        Commands::Export(cmd) => handle_export(&api, cmd),
        Commands::Types { key } => handle_types(&api, key),
        Commands::Profile => handle_profile(&api),
        Commands::Config { key, value } => handle_config(&api, key, value),
    }
}

fn occurrence_state(filters: &OccurrenceFilters) -> FilterState {
    let mut state = FilterState::new()
        .with_period(filters.period)
        .with_date_range(filters.from, filters.to);
    let fields = [
        (Field::Type, &filters.kind),
        (Field::Region, &filters.region),
        (Field::Status, &filters.status),
        (Field::Priority, &filters.priority),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            state.set_field(field, value);
        }
    }
    if let Some(query) = &filters.query {
        state.set_query(query);
    }
    state
}

fn log_state(filters: &LogFilters) -> FilterState {
    let mut state = FilterState::new().with_date_range(filters.from, filters.to);
    let fields = [
        (Field::User, &filters.user),
        (Field::Action, &filters.action),
        (Field::Module, &filters.module),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            state.set_field(field, value);
        }
    }
    if let Some(query) = &filters.query {
        state.set_query(query);
    }
    state
}

fn handle_home<S: RecordSource>(api: &AlertaApi<S>, filters: &OccurrenceFilters) -> Result<()> {
    let result = api.home(&occurrence_state(filters))?;
    if let Some(feed) = result.feed.as_ref().filter(|f| f.total() > 0) {
        print_feed(feed);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list<S: RecordSource>(
    api: &AlertaApi<S>,
    filters: &OccurrenceFilters,
    page: usize,
) -> Result<()> {
    let result = api.list_occurrences(&occurrence_state(filters), page)?;
    print_occurrence_list(&result.occurrences, result.page.as_ref());
    print_messages(&result.messages);
    Ok(())
}

fn handle_show<S: RecordSource>(api: &AlertaApi<S>, id: u64) -> Result<()> {
    let result = api.show_occurrence(id)?;
    if let Some(occurrence) = result.occurrences.first() {
        print_occurrence_details(occurrence, &result.latest, api.offset());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_audit<S: RecordSource>(api: &AlertaApi<S>, filters: &LogFilters, page: usize) -> Result<()> {
    let result = api.audit(&log_state(filters), page)?;
    print_audit(
        &result.logs,
        &result.users,
        result.audit_metrics.as_ref(),
        result.page.as_ref(),
        api.offset(),
    );
    print_messages(&result.messages);
    Ok(())
}

fn handle_dashboard<S: RecordSource>(
    api: &AlertaApi<S>,
    filters: &OccurrenceFilters,
    year: Option<i32>,
) -> Result<()> {
    let result = api.dashboard(&occurrence_state(filters), year)?;
    if let Some(metrics) = &result.dashboard {
        print_dashboard(metrics, result.monthly.as_ref());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_register<S: RecordSource>(api: &mut AlertaApi<S>, form: &RegistrationForm) -> Result<()> {
    let result = api.register(form)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export<S: RecordSource>(api: &AlertaApi<S>, cmd: ExportCommands) -> Result<()> {
    let (result, output) = match cmd {
        ExportCommands::Audit { filters, output } => (api.export_audit(&log_state(&filters))?, output),
        ExportCommands::Log { id, output } => (api.export_log(&id)?, output),
        ExportCommands::Occurrences { filters, output } => {
            (api.export_occurrences(&occurrence_state(&filters))?, output)
        }
    };
    write_export(&result, output.as_deref())?;
    print_messages(&result.messages);
    Ok(())
}

fn write_export(result: &CmdResult, output: Option<&Path>) -> Result<()> {
    let Some(file) = &result.export else {
        return Ok(());
    };
    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&dir).map_err(AlertaError::Io)?;
    let path = dir.join(&file.filename);
    std::fs::write(&path, &file.content).map_err(AlertaError::Io)?;
    tracing::info!(path = %path.display(), mime = file.mime, "export written");
    println!("Exported to {}", path.display());
    Ok(())
}

fn handle_types<S: RecordSource>(api: &AlertaApi<S>, key: Option<String>) -> Result<()> {
    let result = api.types(key.as_deref())?;
    print_types(&result.types);
    print_messages(&result.messages);
    Ok(())
}

fn handle_profile<S: RecordSource>(api: &AlertaApi<S>) -> Result<()> {
    let result = api.profile()?;
    if let Some(profile) = &result.profile {
        print_profile(profile);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config<S: RecordSource>(
    api: &AlertaApi<S>,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
