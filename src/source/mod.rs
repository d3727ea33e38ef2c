//! Record data source: the one inbound HTTP call.
//!
//! Fetches the full record array with a single synchronous `GET` (via
//! `ureq`). No pagination, no query parameters, no authentication, no retry:
//! callers decide what a failure means (the store logs it and stays empty).
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

use crate::config::SourceConfig;
use crate::model::{self, Record};

/// Synchronous client for the record endpoint.
#[derive(Debug, Clone)]
pub struct DataSource {
    url: String,
    timeout: Duration,
}

impl DataSource {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            url: config.url.trim().to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the record array.
    ///
    /// Non-2xx responses, transport errors and bodies that are not a JSON
    /// array all surface as errors. Array elements that are not records are
    /// skipped with a warning on stderr.
    pub fn fetch(&self) -> Result<Vec<Record>> {
        let resp = ureq::get(&self.request_url())
            .timeout(self.timeout)
            .call()
            .with_context(|| format!("GET {} failed", self.url))?;

        let values = resp
            .into_json::<Vec<Value>>()
            .with_context(|| format!("{} did not return a JSON array", self.url))?;
        let (records, skipped) = model::records_from_values(values);
        if skipped > 0 {
            eprintln!(
                "{} skipped {skipped} malformed record(s) from {}",
                "Warning:".yellow().bold(),
                self.url
            );
        }
        Ok(records)
    }

    /// Whether the endpoint answers with a success status within 5 s.
    pub fn is_reachable(&self) -> bool {
        ureq::get(&self.request_url())
            .timeout(self.timeout.min(Duration::from_secs(5)))
            .call()
            .is_ok()
    }

    /// On Windows, "localhost" may try IPv6 (::1) first and stall when the
    /// endpoint only binds IPv4, so requests go to 127.0.0.1 directly.
    fn request_url(&self) -> String {
        self.url.replace("://localhost", "://127.0.0.1")
    }
}

/// Read a record array from a local JSON file instead of the endpoint.
pub fn read_file(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    model::parse_records(&content)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let source = DataSource::from_config(&SourceConfig::default());
        assert_eq!(source.url(), "http://localhost:9000/getdata");
        assert_eq!(source.timeout, Duration::from_millis(10_000));
        assert_eq!(source.request_url(), "http://127.0.0.1:9000/getdata");
    }

    #[test]
    fn read_file_parses_records() {
        let path = std::env::temp_dir().join(format!(
            "insightdash-source-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"[{"country": "Kenya", "topics": ["water"]}]"#).unwrap();
        let records = read_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country.as_deref(), Some("Kenya"));
    }

    #[test]
    fn read_file_keeps_good_records_beside_bad_ones() {
        let path = std::env::temp_dir().join(format!(
            "insightdash-source-mixed-{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"[{"country": 5}, {"startyear": 2015, "start_year": 2016}, {"country": "USA"}]"#,
        )
        .unwrap();
        let records = read_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country.as_deref(), Some("5"));
        assert_eq!(records[1].country.as_deref(), Some("USA"));
    }

    #[test]
    fn read_file_reports_missing_file() {
        let err = read_file(Path::new("/nonexistent/insightdash.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
