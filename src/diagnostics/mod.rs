//! Diagnostics event log.
//!
//! Appends one JSON line per notable event (fetch outcome, server start) to
//! `~/.insightdash/events.jsonl` or the configured path. Logging is
//! best-effort: write failures are ignored and never affect the dashboard.

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::config::{self, LoggingConfig};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// One line of the event log.
#[derive(Debug, Serialize)]
pub struct DiagnosticEvent {
    pub timestamp: String,
    /// `"fetch_ok"`, `"fetch_failed"` or `"server_start"`.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiagnosticEvent {
    fn new(kind: &str, url: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            kind: kind.to_string(),
            url: Some(url.to_string()),
            records: None,
            latency_ms: None,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Handle to the event log file. A disabled log drops every event.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn from_config(config: &LoggingConfig) -> Self {
        let path = if config.enabled {
            config::expand_home(&config.path)
        } else {
            None
        };
        Self { path }
    }

    /// Log to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn fetch_ok(&self, url: &str, records: usize, latency_ms: u64) {
        let mut event = DiagnosticEvent::new("fetch_ok", url);
        event.records = Some(records);
        event.latency_ms = Some(latency_ms);
        self.record(&event);
    }

    pub fn fetch_failed(&self, url: &str, error: &anyhow::Error) {
        let mut event = DiagnosticEvent::new("fetch_failed", url);
        event.error = Some(format!("{error:#}"));
        self.record(&event);
    }

    pub fn server_start(&self, addr: &str, records: usize) {
        let mut event = DiagnosticEvent::new("server_start", addr);
        event.records = Some(records);
        self.record(&event);
    }

    /// Append an event. Best-effort: failures are silently ignored.
    pub fn record(&self, event: &DiagnosticEvent) {
        let _ = self.append(event);
    }

    fn append(&self, event: &DiagnosticEvent) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}
