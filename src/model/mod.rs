//! Insight record: one datum of the dashboard dataset.
//!
//! Records arrive as a JSON array from the data source. The upstream feed is
//! loosely typed: years and scores are sometimes empty strings, topics are
//! sometimes a bare string, and text fields occasionally hold numbers.
//! Field deserialization is lenient, and an element that still fails (not an
//! object, duplicate year keys) is skipped on its own rather than failing the
//! array. Absent and empty-string text fields stay distinct (`None` vs
//! `Some("")`).

mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single insight record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(
        rename = "startyear",
        alias = "start_year",
        alias = "startYear",
        default,
        deserialize_with = "lenient::year",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_year: Option<i32>,
    #[serde(
        rename = "endyear",
        alias = "end_year",
        alias = "endYear",
        default,
        deserialize_with = "lenient::year",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::topics")]
    pub topics: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sector: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<String>,
    /// Political / economic / social / technological / legal / environmental.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pestle: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub swot: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub intensity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub likelihood: Option<f64>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub relevance: Option<f64>,
    /// Wire fields the pipeline does not use (title, url, insight, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parse a JSON array of records, dropping elements that are not records.
///
/// Fails only when the document itself is not a JSON array.
pub fn parse_records(json: &str) -> serde_json::Result<Vec<Record>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    Ok(records_from_values(values).0)
}

/// Convert raw array elements into records.
///
/// Returns the records in input order and the number of skipped elements.
pub fn records_from_values(values: Vec<Value>) -> (Vec<Record>, usize) {
    let total = values.len();
    let records: Vec<Record> = values
        .into_iter()
        .filter_map(|value| Record::deserialize(value).ok())
        .collect();
    let skipped = total - records.len();
    (records, skipped)
}
