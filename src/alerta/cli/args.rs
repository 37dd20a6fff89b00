use alerta::filter::Period;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "alerta")]
#[command(about = "Occurrence feed, audit log and dashboard for fire-department dispatch", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read records from JSON files in this directory instead of the API
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Use the built-in sample records (no network)
    #[arg(long, global = true, conflicts_with = "data")]
    pub mock: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Occurrence filter bar.
#[derive(Args, Debug, Default)]
pub struct OccurrenceFilters {
    /// Only the last day, week, month, quarter or year
    #[arg(short, long)]
    pub period: Option<Period>,

    /// Occurrence type, by name or id (e.g. incendio, 3)
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Region
    #[arg(short, long)]
    pub region: Option<String>,

    /// Status (aberta, em-andamento, encerrada, cancelada)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Priority (baixa, media, alta, critica)
    #[arg(long)]
    pub priority: Option<String>,

    /// Free-text search
    #[arg(short, long)]
    pub query: Option<String>,

    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

/// Audit log filter bar.
#[derive(Args, Debug, Default)]
pub struct LogFilters {
    /// User name
    #[arg(short, long)]
    pub user: Option<String>,

    /// Action (login, logout, editou, excluiu, criou)
    #[arg(short, long)]
    pub action: Option<String>,

    /// Module (sistema, ocorrencias, dashboard, usuarios)
    #[arg(short, long)]
    pub module: Option<String>,

    /// Free-text search over user, description, module and IP
    #[arg(short, long)]
    pub query: Option<String>,

    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Live feed grouped by status (default)
    #[command(alias = "h")]
    Home {
        #[command(flatten)]
        filters: OccurrenceFilters,
    },

    /// List occurrences, one page at a time
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filters: OccurrenceFilters,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show one occurrence and the latest others
    #[command(alias = "v")]
    Show {
        /// Occurrence id
        id: u64,
    },

    /// Audit log with summary counts
    #[command(alias = "logs")]
    Audit {
        #[command(flatten)]
        filters: LogFilters,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Operational dashboard
    #[command(alias = "dash")]
    Dashboard {
        #[command(flatten)]
        filters: OccurrenceFilters,

        /// Year for the monthly chart (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Register a new occurrence
    #[command(alias = "n")]
    Register {
        /// Occurrence type, by name or id
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Subtype, by id or label (defaults to the first of the type)
        #[arg(short, long)]
        subtype: Option<String>,

        /// Address or reference point
        #[arg(short, long)]
        location: String,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Time (HH:MM)
        #[arg(long)]
        time: String,

        /// Victims involved
        #[arg(long)]
        victims: Option<String>,

        /// Free-form details
        #[arg(long)]
        details: Option<String>,

        /// Responsible team (1, 2 or 3 GBM)
        #[arg(long)]
        team: String,
    },

    /// Export records as semicolon-delimited CSV
    #[command(subcommand)]
    Export(ExportCommands),

    /// List occurrence types and their subtypes
    Types {
        /// Narrow to one type, by name or id
        key: Option<String>,
    },

    /// Show the signed-in user's profile
    Profile,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. api-url, page-size, utc-offset)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the filtered audit log
    Audit {
        #[command(flatten)]
        filters: LogFilters,

        /// Directory to write the file into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Export a single log entry
    Log {
        /// Log entry id
        id: String,

        /// Directory to write the file into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Export the filtered occurrences
    Occurrences {
        #[command(flatten)]
        filters: OccurrenceFilters,

        /// Directory to write the file into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM-DD, got {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["alerta", "--mock"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.mock);
    }

    #[test]
    fn list_flags_parse() {
        let cli = Cli::try_parse_from([
            "alerta", "ls", "--type", "incendio", "--period", "semana", "--from", "2025-03-01",
            "--page", "2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::List { filters, page }) => {
                assert_eq!(filters.kind.as_deref(), Some("incendio"));
                assert_eq!(filters.period, Some(Period::Week));
                assert_eq!(filters.from, NaiveDate::from_ymd_opt(2025, 3, 1));
                assert_eq!(page, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["alerta", "audit", "--from", "01/03/2025"]).is_err());
    }

    #[test]
    fn mock_and_data_conflict() {
        assert!(Cli::try_parse_from(["alerta", "--mock", "--data", "x"]).is_err());
    }

    #[test]
    fn export_log_takes_an_id() {
        let cli = Cli::try_parse_from(["alerta", "export", "log", "17"]).unwrap();
        match cli.command {
            Some(Commands::Export(ExportCommands::Log { id, output })) => {
                assert_eq!(id, "17");
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
