//! Filter Set and the record inclusion predicate.
//!
//! Ten independent filters narrow the record store. Each is either unset
//! (matches everything) or a single value. All active filters combine with
//! AND; there is no OR mode and no negation.
//!
//! # Year rule
//!
//! The two year filters are evaluated together, before the text filters:
//!
//! | start | end | record included when                          |
//! |-------|-----|-----------------------------------------------|
//! | set   | set | `start_year >= start` and `end_year <= end`   |
//! | set   | -   | `start_year == start`                         |
//! | -     | set | `end_year == end`                             |
//! | -     | -   | always                                        |
//!
//! A record missing the compared year is excluded by any active year filter.

pub mod options;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::model::Record;

// ---------------------------------------------------------------------------
// Filter fields
// ---------------------------------------------------------------------------

/// Name of one of the ten dashboard filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    StartYear,
    EndYear,
    Topic,
    Sector,
    Region,
    Pestle,
    Source,
    Swot,
    Country,
    City,
}

impl FilterField {
    /// All fields, in dashboard control order.
    pub const ALL: [FilterField; 10] = [
        Self::StartYear,
        Self::EndYear,
        Self::Topic,
        Self::Sector,
        Self::Region,
        Self::Pestle,
        Self::Source,
        Self::Swot,
        Self::Country,
        Self::City,
    ];

    /// Single-valued text fields compared by equality.
    pub const TEXT: [FilterField; 7] = [
        Self::Sector,
        Self::Region,
        Self::Pestle,
        Self::Source,
        Self::Swot,
        Self::Country,
        Self::City,
    ];

    /// Stable wire name used in query strings and JSON.
    pub fn name(self) -> &'static str {
        match self {
            Self::StartYear => "start_year",
            Self::EndYear => "end_year",
            Self::Topic => "topic",
            Self::Sector => "sector",
            Self::Region => "region",
            Self::Pestle => "pestle",
            Self::Source => "source",
            Self::Swot => "swot",
            Self::Country => "country",
            Self::City => "city",
        }
    }

    /// Human label for selection controls and tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::StartYear => "Start Year",
            Self::EndYear => "End Year",
            Self::Topic => "Topics",
            Self::Sector => "Sector",
            Self::Region => "Region",
            Self::Pestle => "PEST",
            Self::Source => "Source",
            Self::Swot => "SWOT",
            Self::Country => "Country",
            Self::City => "City",
        }
    }

    pub fn is_year(self) -> bool {
        matches!(self, Self::StartYear | Self::EndYear)
    }

    /// The record's value for a single-valued text field.
    ///
    /// Returns `None` for the year and topic fields, which are not scalar text.
    pub fn text_of(self, record: &Record) -> Option<&str> {
        let value = match self {
            Self::Sector => &record.sector,
            Self::Region => &record.region,
            Self::Pestle => &record.pestle,
            Self::Source => &record.source,
            Self::Swot => &record.swot,
            Self::Country => &record.country,
            Self::City => &record.city,
            Self::StartYear | Self::EndYear | Self::Topic => return None,
        };
        value.as_deref()
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterField {
    type Err = anyhow::Error;

    /// Accepts the wire names and the dashboard control names
    /// (`yearFilter`, `PESTFilter`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let field = match s {
            "start_year" | "startyear" | "yearFilter" => Self::StartYear,
            "end_year" | "endyear" | "endYearFilter" => Self::EndYear,
            "topic" | "topics" | "topicsFilter" => Self::Topic,
            "sector" | "sectorFilter" => Self::Sector,
            "region" | "regionFilter" => Self::Region,
            "pestle" | "PESTFilter" => Self::Pestle,
            "source" | "sourceFilter" => Self::Source,
            "swot" | "SWOTFilter" => Self::Swot,
            "country" | "countryFilter" => Self::Country,
            "city" | "cityFilter" => Self::City,
            _ => anyhow::bail!("unknown filter: {s}"),
        };
        Ok(field)
    }
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// A single change to the Filter Set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    /// Set a field from its raw control value. An empty value clears it.
    Set(FilterField, String),
    /// Reset a field to "All".
    Clear(FilterField),
}

// ---------------------------------------------------------------------------
// Filter set
// ---------------------------------------------------------------------------

/// The ten active filter values. `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub topic: Option<String>,
    pub sector: Option<String>,
    pub region: Option<String>,
    pub pestle: Option<String>,
    pub source: Option<String>,
    pub swot: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl FilterSet {
    /// Apply one update. Rejects a non-integer year and leaves the set as-is.
    pub fn update(&mut self, update: FilterUpdate) -> Result<()> {
        match update {
            FilterUpdate::Clear(field) => self.clear(field),
            FilterUpdate::Set(field, raw) if raw.is_empty() => self.clear(field),
            FilterUpdate::Set(field, raw) => match field {
                FilterField::StartYear => self.start_year = Some(parse_year(field, &raw)?),
                FilterField::EndYear => self.end_year = Some(parse_year(field, &raw)?),
                _ => {
                    if let Some(slot) = self.text_slot(field) {
                        *slot = Some(raw);
                    }
                }
            },
        }
        Ok(())
    }

    /// Builder form of [`update`](Self::update) with `Set`.
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Result<Self> {
        self.update(FilterUpdate::Set(field, value.into()))?;
        Ok(self)
    }

    fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::StartYear => self.start_year = None,
            FilterField::EndYear => self.end_year = None,
            _ => {
                if let Some(slot) = self.text_slot(field) {
                    *slot = None;
                }
            }
        }
    }

    /// Storage for a string-valued filter; `None` for the year fields.
    fn text_slot(&mut self, field: FilterField) -> Option<&mut Option<String>> {
        let slot = match field {
            FilterField::Topic => &mut self.topic,
            FilterField::Sector => &mut self.sector,
            FilterField::Region => &mut self.region,
            FilterField::Pestle => &mut self.pestle,
            FilterField::Source => &mut self.source,
            FilterField::Swot => &mut self.swot,
            FilterField::Country => &mut self.country,
            FilterField::City => &mut self.city,
            FilterField::StartYear | FilterField::EndYear => return None,
        };
        Some(slot)
    }

    /// Current value of a field, rendered as text.
    pub fn get(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::StartYear => self.start_year.map(|y| y.to_string()),
            FilterField::EndYear => self.end_year.map(|y| y.to_string()),
            FilterField::Topic => self.topic.clone(),
            _ => self.text_filter(field).map(str::to_string),
        }
    }

    fn text_filter(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::Sector => &self.sector,
            FilterField::Region => &self.region,
            FilterField::Pestle => &self.pestle,
            FilterField::Source => &self.source,
            FilterField::Swot => &self.swot,
            FilterField::Country => &self.country,
            FilterField::City => &self.city,
            FilterField::StartYear | FilterField::EndYear | FilterField::Topic => return None,
        };
        value.as_deref()
    }

    /// True when every filter is unset.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Active filters as `(field, value)` pairs, in control order.
    pub fn active(&self) -> Vec<(FilterField, String)> {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|v| (field, v)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Predicate
    // -----------------------------------------------------------------------

    /// Decide whether a record passes every active filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_years(record)
            && self.matches_topic(record)
            && FilterField::TEXT.into_iter().all(|field| {
                self.text_filter(field)
                    .is_none_or(|want| field.text_of(record) == Some(want))
            })
    }

    fn matches_years(&self, record: &Record) -> bool {
        match (self.start_year, self.end_year) {
            (Some(start), Some(end)) => matches!(
                (record.start_year, record.end_year),
                (Some(s), Some(e)) if s >= start && e <= end
            ),
            (Some(start), None) => record.start_year == Some(start),
            (None, Some(end)) => record.end_year == Some(end),
            (None, None) => true,
        }
    }

    fn matches_topic(&self, record: &Record) -> bool {
        self.topic
            .as_deref()
            .is_none_or(|want| record.topics.iter().any(|t| t == want))
    }

    /// The matching subset, in store order.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    // -----------------------------------------------------------------------
    // Query strings
    // -----------------------------------------------------------------------

    /// Build a Filter Set from the query string of a request URL.
    ///
    /// Unknown keys and malformed years are ignored; empty values mean unset.
    /// Values are percent-decoded and `+` is read as a space.
    pub fn from_query(url: &str) -> Self {
        let mut filters = Self::default();
        let Some(query) = url.split_once('?').map(|(_, q)| q) else {
            return filters;
        };

        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let Ok(field) = decode(key).parse::<FilterField>() else {
                continue;
            };
            let _ = filters.update(FilterUpdate::Set(field, decode(value)));
        }

        filters
    }

    /// Render the active filters as a query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        self.active()
            .into_iter()
            .map(|(field, value)| format!("{}={}", field.name(), encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn parse_year(field: FilterField, raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .with_context(|| format!("{field} expects a year, got '{raw}'"))
}

fn decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

fn encode(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, percent_encoding::NON_ALPHANUMERIC).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
