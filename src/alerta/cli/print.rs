//! Terminal output for each view.
//!
//! Layout math (width, truncation, padding) is unicode-aware; colors go
//! through `colored`, which honors `NO_COLOR` and non-tty output.

use alerta::api::{CmdMessage, MessageLevel};
use alerta::catalog::OccurrenceType;
use alerta::config::{AlertaConfig, KEYS};
use alerta::metrics::{AuditMetrics, DashboardMetrics, MONTH_LABELS};
use alerta::model::{LogEntry, Occurrence, Profile, StatusCategory};
use alerta::pager::PageInfo;
use alerta::pipeline::Buckets;
use chrono::{DateTime, FixedOffset, Utc};
use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 6;
const BAR_WIDTH: usize = 40;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn status_colored(status: StatusCategory, text: &str) -> ColoredString {
    match status {
        StatusCategory::Open => text.yellow(),
        StatusCategory::InProgress => text.red(),
        StatusCategory::Closed => text.green(),
        StatusCategory::Cancelled => text.dimmed(),
    }
}

pub fn print_feed(feed: &Buckets<StatusCategory, Occurrence>) {
    for (i, (status, occurrences)) in feed.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let header = format!("{} ({})", status.label(), occurrences.len());
        println!("{}", status_colored(*status, &header).bold());
        if occurrences.is_empty() {
            println!("    {}", "Nenhuma ocorrência.".dimmed());
        }
        for occurrence in occurrences {
            print_occurrence_line(occurrence);
        }
    }
}

pub fn print_occurrence_list(occurrences: &[Occurrence], page: Option<&PageInfo>) {
    for occurrence in occurrences {
        print_occurrence_line(occurrence);
    }
    if let Some(page) = page {
        print_page_info(page);
    }
}

/// `#id  title · type  [STATUS]        3 hours ago`
fn print_occurrence_line(occurrence: &Occurrence) {
    let id = format!("{:>width$}  ", format!("#{}", occurrence.id), width = ID_WIDTH);
    let status = format!(" [{}]", occurrence.status.label());
    let time_ago = format_time_ago(occurrence.timestamp);

    let text = format!("{} · {}", occurrence.title, occurrence.type_name);
    let fixed = 2 + id.width() + status.width() + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let text = truncate_to_width(&text, available);
    let padding = available.saturating_sub(text.width());

    println!(
        "  {}{}{}{}{}",
        id.yellow(),
        text,
        status_colored(occurrence.status, &status),
        " ".repeat(padding),
        time_ago.dimmed()
    );
}

pub fn print_occurrence_details(occurrence: &Occurrence, latest: &[Occurrence], offset: FixedOffset) {
    println!(
        "{} {}",
        format!("#{}", occurrence.id).yellow(),
        occurrence.title.bold()
    );
    println!("--------------------------------");
    print_field("Status", &status_colored(occurrence.status, occurrence.status.label()).to_string());
    print_field("Tipo", &occurrence.type_name);
    print_field("Descrição", &occurrence.type_description);
    if let Some(subtype) = &occurrence.subtype {
        print_field("Subtipo", subtype);
    }
    print_field("Prioridade", occurrence.priority.label());
    print_field("Data", &format_local(occurrence.timestamp, offset));
    print_optional("Região", &occurrence.region);
    print_optional("Endereço", &occurrence.address);
    print_optional("Equipe", &occurrence.team);
    print_optional("Vítimas", &occurrence.victims);
    print_optional("Detalhes", &occurrence.details);

    if !latest.is_empty() {
        println!();
        println!("{}", "Últimas ocorrências".bold());
        for other in latest {
            print_occurrence_line(other);
        }
    }
}

fn print_field(label: &str, value: &str) {
    println!("{:<12} {}", format!("{}:", label).dimmed(), value);
}

fn print_optional(label: &str, value: &Option<String>) {
    if let Some(value) = value {
        print_field(label, value);
    }
}

pub fn print_audit(
    logs: &[LogEntry],
    users: &[String],
    metrics: Option<&AuditMetrics>,
    page: Option<&PageInfo>,
    offset: FixedOffset,
) {
    if let Some(m) = metrics {
        println!(
            "{} {}   {} {}   {} {}   {} {}",
            "Logins:".dimmed(),
            m.logins,
            "Edições:".dimmed(),
            m.edits,
            "Exclusões:".dimmed(),
            m.deletes,
            "Usuários ativos (24h):".dimmed(),
            m.active_users
        );
    }
    if !users.is_empty() {
        println!("{} {}", "Usuários:".dimmed(), users.join(", "));
    }
    if metrics.is_some() || !users.is_empty() {
        println!();
    }

    for entry in logs {
        let head = format!(
            "{:>5}  {}  {:<8} {:<12} ",
            entry.id,
            format_local(entry.timestamp, offset),
            entry.action.label(),
            entry.module.label()
        );
        let tail = format!("  {}", entry.ip);
        let available = LINE_WIDTH.saturating_sub(head.width() + tail.width());
        let text = truncate_to_width(&format!("{}: {}", entry.user, entry.description), available);
        let padding = available.saturating_sub(text.width());
        println!("{}{}{}{}", head, text, " ".repeat(padding), tail.dimmed());
    }

    if let Some(page) = page {
        print_page_info(page);
    }
}

/// `Mostrando 1–20 de 120 (página 1 de 6)`
fn print_page_info(page: &PageInfo) {
    if page.total_items == 0 {
        return;
    }
    println!();
    println!(
        "{}",
        format!(
            "Mostrando {}–{} de {} (página {} de {})",
            page.range_start, page.range_end, page.total_items, page.number, page.total_pages
        )
        .dimmed()
    );
}

pub fn print_dashboard(metrics: &DashboardMetrics, monthly: Option<&(i32, [usize; 12])>) {
    println!("{}", "Indicadores".bold());
    print_field("Total", &metrics.total.to_string());
    print_field("Atendidas", &metrics.attended.to_string().green().to_string());
    print_field("Pendentes", &metrics.not_attended.to_string().red().to_string());
    print_field("Canceladas", &metrics.cancelled.to_string());
    print_field("Eficiência", &format!("{:.1}%", metrics.efficiency));

    println!();
    println!("{}", "Por prioridade".bold());
    let max = metrics.by_priority.iter().map(|(_, n)| *n).max().unwrap_or(0);
    for (priority, count) in &metrics.by_priority {
        println!("{:<10} {:>4} {}", priority.label(), count, bar(*count, max));
    }

    if let Some((year, counts)) = monthly {
        println!();
        println!("{}", format!("Ocorrências por mês ({})", year).bold());
        let max = counts.iter().copied().max().unwrap_or(0);
        for (label, count) in MONTH_LABELS.iter().zip(counts.iter()) {
            println!("{:<10} {:>4} {}", label, count, bar(*count, max));
        }
    }
}

fn bar(count: usize, max: usize) -> ColoredString {
    let len = if max == 0 { 0 } else { count * BAR_WIDTH / max };
    "█".repeat(len).red()
}

pub fn print_types(types: &[OccurrenceType]) {
    for kind in types {
        println!("{} {}", format!("{:>3}.", kind.id).yellow(), kind.name.bold());
        for subtype in &kind.subtypes {
            println!("       {} {}", format!("{}.", subtype.id).dimmed(), subtype.label);
        }
    }
}

pub fn print_profile(profile: &Profile) {
    println!("{}", profile.name.bold());
    print_field("Cargo", &profile.role);
    print_field("Batalhão", &profile.battalion);
    print_field("Matrícula", &profile.registry);
    print_field("Telefone", &profile.phone);
    print_field("E-mail", &profile.email);
    print_field("CPF", &profile.cpf);
}

pub fn print_config(config: &AlertaConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

pub fn format_local(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
