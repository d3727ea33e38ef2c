/// Configuration schema and defaults for insightdash.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[source]`, `[web]`, `[charts]` and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override.
use serde::{Deserialize, Serialize};

use crate::charts::palette::DEFAULT_PALETTE;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level insightdash configuration.
///
/// Maps directly to `~/.insightdash/config.toml` and `.insightdash.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub source: SourceConfig,
    pub web: WebConfig,
    pub charts: ChartsConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [source]
// ---------------------------------------------------------------------------

/// Where the record array is fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Endpoint returning a JSON array of records.
    pub url: String,
    /// Request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9000/getdata".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address for the dashboard server.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
    /// Maximum number of distinct filter combinations kept in the chart cache.
    pub cache_entries: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
            cache_entries: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// [charts]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Category colours for the doughnut and polar-area charts, reused
    /// round-robin. An empty list means the built-in palette.
    pub palette: Vec<String>,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether the diagnostics event log is written.
    pub enabled: bool,
    /// Path to the event log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.insightdash/events.jsonl".to_string(),
        }
    }
}

impl DashConfig {
    /// Annotated default config written by `insightdash config init`.
    pub fn default_toml() -> String {
        r##"# insightdash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (INSIGHTDASH_*)
#   2. Project config (.insightdash.toml in current directory)
#   3. User global config (~/.insightdash/config.toml)
#   4. Built-in defaults

[source]
url = "http://localhost:9000/getdata"   # JSON array of insight records
timeout_ms = 10000

[web]
addr = "127.0.0.1:9747"
open_browser = true
cache_entries = 64                      # Filter combinations kept per dataset

[charts]
palette = ["#FF6384", "#36A2EB", "#FFCE56", "#FF9F40", "#4BC0C0", "#F56C42"]

[logging]
enabled = true
path = "~/.insightdash/events.jsonl"
"##
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml_str = r#"
[source]
url = "http://127.0.0.1:8080/insights"

[web]
open_browser = false
"#;
        let config: DashConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source.url, "http://127.0.0.1:8080/insights");
        assert_eq!(config.source.timeout_ms, 10_000);
        assert!(!config.web.open_browser);
        assert_eq!(config.web.addr, "127.0.0.1:9747");
        assert_eq!(config.charts.palette.len(), 6);
        assert!(config.logging.enabled);
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: DashConfig = toml::from_str("").unwrap();
        assert_eq!(config.source.url, "http://localhost:9000/getdata");
        assert_eq!(config.web.cache_entries, 64);
    }

    #[test]
    fn default_toml_parses_back() {
        let config: DashConfig = toml::from_str(&DashConfig::default_toml()).unwrap();
        assert_eq!(config.charts.palette, ChartsConfig::default().palette);
        assert_eq!(config.logging.path, "~/.insightdash/events.jsonl");
    }

    #[test]
    fn custom_palette_is_accepted() {
        let config: DashConfig =
            toml::from_str("[charts]\npalette = [\"#111111\", \"#222222\"]").unwrap();
        assert_eq!(config.charts.palette, vec!["#111111", "#222222"]);
    }
}
