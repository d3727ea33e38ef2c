//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `insightdash serve`: web dashboard
//! - `insightdash charts`: chart inputs for a set of filters
//! - `insightdash records`: the filtered records
//! - `insightdash options`: selectable values per filter
//! - `insightdash health`: data source, config and log status
//! - `insightdash config show|init|set|reset`: configuration management

use std::path::Path;

use anyhow::Result;
use colored::{ColoredString, Colorize};

use crate::charts::{CategoryCounts, Metric, Palette};
use crate::config;
use crate::diagnostics::EventLog;
use crate::filter::FilterSet;
use crate::filter::options::FilterOptions;
use crate::model::Record;
use crate::pipeline::{self, ChartInputs};
use crate::source::{self, DataSource};
use crate::store::RecordStore;
use crate::web::{self, DashboardState};

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Load the record store from a local file, or fetch it from the source.
///
/// A fetch failure yields the empty store (already logged); a bad local file
/// is an error, since the user named it explicitly.
fn load_store(file: Option<&Path>) -> Result<RecordStore> {
    if let Some(path) = file {
        return Ok(RecordStore::from_records(source::read_file(path)?));
    }
    let cfg = config::load();
    let source = DataSource::from_config(&cfg.source);
    Ok(RecordStore::load(&source, &EventLog::from_config(&cfg.logging)))
}

// ---------------------------------------------------------------------------
// insightdash serve
// ---------------------------------------------------------------------------

/// Fetch the dataset once and serve the dashboard.
pub fn run_serve(addr: Option<String>, no_browser: bool) -> Result<()> {
    let cfg = config::load();
    let log = EventLog::from_config(&cfg.logging);
    let source = DataSource::from_config(&cfg.source);

    println!("{} {}", "Fetching records from".dimmed(), source.url());
    let store = RecordStore::load(&source, &log);
    if store.is_empty() {
        println!("{}", "No records loaded; the dashboard will show no charts.".yellow());
    } else {
        println!("{} {} records", "✓".green().bold(), store.len());
    }

    let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
    let open = cfg.web.open_browser && !no_browser;
    web::serve(&addr, DashboardState::new(cfg, store), &log, open)
}

// ---------------------------------------------------------------------------
// insightdash charts
// ---------------------------------------------------------------------------

/// Print the three chart inputs for the given filters.
pub fn run_charts(filters: &FilterSet, format: OutputFormat, file: Option<&Path>) -> Result<()> {
    let store = load_store(file)?;
    let palette = Palette::new(&config::load().charts.palette);
    let inputs = pipeline::compute(store.records(), filters, &palette);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inputs)?),
        OutputFormat::Csv => print_charts_csv(&inputs),
        OutputFormat::Table => print_charts_table(&inputs, filters),
    }

    Ok(())
}

fn print_charts_table(inputs: &ChartInputs, filters: &FilterSet) {
    println!("{}", "Insight Charts".bold().cyan());
    println!("{}", "=".repeat(60));
    print_active_filters(filters);
    println!(
        "  {} {} of {}",
        "Matched records:".bold(),
        inputs.matched_records,
        inputs.total_records
    );
    println!();

    if inputs.total_records == 0 {
        println!("{}", "No data available.".yellow());
        return;
    }

    println!("{}", "Bar Chart (per record)".bold().cyan());
    println!(
        "  {:<24} {:>10} {:>10} {:>10}",
        "Country", "Intensity", "Likelihood", "Relevance"
    );
    println!("  {}", "-".repeat(56));
    for (i, label) in inputs.series.labels.iter().enumerate() {
        let value = |m: usize| {
            inputs.series.datasets[m].data[i].map_or_else(|| "-".to_string(), format_score)
        };
        let line = format!(
            "  {:<24} {:>10} {:>10} {:>10}",
            truncate(label_text(label), 24),
            value(0),
            value(1),
            value(2),
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
    println!();

    print_counts_table("Doughnut Chart (records per country)", &inputs.by_country);
    println!();
    print_counts_table("Polar Area Chart (records per region)", &inputs.by_region);
}

fn print_counts_table(title: &str, counts: &CategoryCounts) {
    println!("{}", title.bold().cyan());
    if counts.labels.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for (slot, (label, count)) in counts.labels.iter().zip(counts.counts()).enumerate() {
        println!(
            "  {} {:<30} {:>6}",
            swatch(counts.color_of(slot)),
            truncate(label_text(label), 30),
            count
        );
    }
}

fn print_charts_csv(inputs: &ChartInputs) {
    println!("chart,label,series,value");
    for (i, label) in inputs.series.labels.iter().enumerate() {
        for (metric, dataset) in Metric::ALL.iter().zip(&inputs.series.datasets) {
            let value = dataset.data[i].map(format_score).unwrap_or_default();
            println!(
                "bar,{},{},{}",
                csv_field(label_text(label)),
                metric.label(),
                value
            );
        }
    }
    for (chart, counts) in [("doughnut", &inputs.by_country), ("polar", &inputs.by_region)] {
        for (label, count) in counts.labels.iter().zip(counts.counts()) {
            println!("{chart},{},count,{count}", csv_field(label_text(label)));
        }
    }
}

// ---------------------------------------------------------------------------
// insightdash records
// ---------------------------------------------------------------------------

/// Print the records that pass the filters.
pub fn run_records(filters: &FilterSet, format: OutputFormat, file: Option<&Path>) -> Result<()> {
    let store = load_store(file)?;
    let matched = filters.apply(store.records());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matched)?),
        OutputFormat::Csv => print_records_csv(&matched),
        OutputFormat::Table => {
            println!("{}", "Filtered Records".bold().cyan());
            println!("{}", "=".repeat(60));
            print_active_filters(filters);
            println!("  {} {} of {}", "Matched:".bold(), matched.len(), store.len());
            println!();
            print_records_table(&matched);
        }
    }

    Ok(())
}

fn print_records_table(records: &[&Record]) {
    println!(
        "  {:>5} {:>5}  {:<20} {:<18} {:<14} {:<20}",
        "Start", "End", "Country", "Region", "Sector", "Topics"
    );
    println!("  {}", "-".repeat(88));
    for (i, r) in records.iter().enumerate() {
        let line = format!(
            "  {:>5} {:>5}  {:<20} {:<18} {:<14} {:<20}",
            year_text(r.start_year),
            year_text(r.end_year),
            truncate(r.country.as_deref().unwrap_or("-"), 20),
            truncate(r.region.as_deref().unwrap_or("-"), 18),
            truncate(r.sector.as_deref().unwrap_or("-"), 14),
            truncate(&r.topics.join(";"), 20),
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_records_csv(records: &[&Record]) {
    println!(
        "start_year,end_year,topics,sector,region,pestle,source,swot,country,city,intensity,likelihood,relevance"
    );
    for r in records {
        let text = |v: &Option<String>| csv_field(v.as_deref().unwrap_or_default());
        let score = |v: Option<f64>| v.map(format_score).unwrap_or_default();
        println!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            r.start_year.map(|y| y.to_string()).unwrap_or_default(),
            r.end_year.map(|y| y.to_string()).unwrap_or_default(),
            csv_field(&r.topics.join(";")),
            text(&r.sector),
            text(&r.region),
            text(&r.pestle),
            text(&r.source),
            text(&r.swot),
            text(&r.country),
            text(&r.city),
            score(r.intensity),
            score(r.likelihood),
            score(r.relevance),
        );
    }
}

// ---------------------------------------------------------------------------
// insightdash options
// ---------------------------------------------------------------------------

/// Print the selectable values for every filter.
pub fn run_options(format: OutputFormat, file: Option<&Path>) -> Result<()> {
    let store = load_store(file)?;
    let options = FilterOptions::collect(store.records());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        OutputFormat::Csv => {
            println!("field,value");
            for field in &options.fields {
                for value in &field.values {
                    println!("{},{}", field.field, csv_field(value));
                }
            }
        }
        OutputFormat::Table => {
            println!("{}", "Filter Options".bold().cyan());
            println!("{}", "=".repeat(60));
            for field in &options.fields {
                let preview: Vec<&str> = field.values.iter().take(6).map(String::as_str).collect();
                let more = field.values.len().saturating_sub(preview.len());
                let mut line = preview.join(", ");
                if more > 0 {
                    line.push_str(&format!(" … (+{more})"));
                }
                println!(
                    "  {} {:>4}  {}",
                    format!("{:<12}", field.label).bold(),
                    field.values.len(),
                    line.dimmed()
                );
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// insightdash health
// ---------------------------------------------------------------------------

/// Check the data source, config files and event log.
pub fn run_health() -> Result<()> {
    println!("{}", "insightdash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.insightdash/config.toml found"
        } else {
            "not found (run `insightdash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".insightdash.toml found"
        } else {
            "none (optional)"
        },
    );

    let source = DataSource::from_config(&cfg.source);
    let reachable = source.is_reachable();
    print_health_item(
        "Data source",
        reachable,
        &if reachable {
            format!("reachable at {}", source.url())
        } else {
            format!("not reachable at {}", source.url())
        },
    );

    let log = EventLog::from_config(&cfg.logging);
    match log.path() {
        Some(path) => print_health_item(
            "Event log",
            path.exists(),
            &if path.exists() {
                path.display().to_string()
            } else {
                format!("{} (not written yet)", path.display())
            },
        ),
        None => print_health_item("Event log", false, "disabled"),
    }

    print_health_item("Dashboard address", true, &cfg.web.addr);

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// insightdash config show | init | set | reset
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective insightdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    for (exists, name) in [
        (
            config::global_config_file().is_some_and(|p| p.exists()),
            "~/.insightdash/config.toml",
        ),
        (
            config::project_config_file().is_some_and(|p| p.exists()),
            ".insightdash.toml",
        ),
    ] {
        if exists {
            println!("  {} {}", "✓".green(), name.dimmed());
        } else {
            println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
        }
    }
    println!("  {} {}", "·".dimmed(), "INSIGHTDASH_* environment variables".dimmed());

    Ok(())
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn print_active_filters(filters: &FilterSet) {
    let active = filters.active();
    if active.is_empty() {
        println!("  {} {}", "Filters:".bold(), "none (all records)".dimmed());
    } else {
        let text: Vec<String> = active
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        println!("  {} {}", "Filters:".bold(), text.join("  "));
    }
}

/// Render a missing label the way the chart shows it.
fn label_text(label: &Option<String>) -> &str {
    label.as_deref().unwrap_or("(none)")
}

fn year_text(year: Option<i32>) -> String {
    year.map_or_else(|| "-".to_string(), |y| y.to_string())
}

/// Integers print without a fractional part.
fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// A coloured block for a `#RRGGBB` palette entry.
fn swatch(color: Option<&str>) -> ColoredString {
    match color.and_then(parse_hex) {
        Some((r, g, b)) => "●".truecolor(r, g, b),
        None => "●".normal(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
