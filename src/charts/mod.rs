//! Chart inputs: projections of a filtered record subset.
//!
//! Three shapes feed the dashboard:
//!
//! - **Series** (stacked bar chart): one entry per record, labelled by
//!   country, with intensity / likelihood / relevance as parallel series.
//!   Not grouped, not sorted; labels may repeat.
//! - **Counts by country** (doughnut chart) and **counts by region**
//!   (polar-area chart): distinct keys in order of first appearance, with the
//!   number of records per key.
//!
//! Every projection is total: empty input produces empty labels and empty
//! data arrays. Field names serialize in the camelCase Chart.js expects, so
//! the frontend hands these structures straight to the chart library.

pub mod palette;
pub mod spec;

use serde::Serialize;

use crate::model::Record;
pub use palette::Palette;
pub use spec::{ChartKind, ChartOptions, ChartSpec};

// ---------------------------------------------------------------------------
// Series chart
// ---------------------------------------------------------------------------

/// The three per-record scores shown in the bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Intensity,
    Likelihood,
    Relevance,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Self::Intensity, Self::Likelihood, Self::Relevance];

    pub fn label(self) -> &'static str {
        match self {
            Self::Intensity => "Intensity",
            Self::Likelihood => "Likelihood",
            Self::Relevance => "Relevance",
        }
    }

    pub fn value_of(self, record: &Record) -> Option<f64> {
        match self {
            Self::Intensity => record.intensity,
            Self::Likelihood => record.likelihood,
            Self::Relevance => record.relevance,
        }
    }

    /// `(fill, border)` colours for this series.
    fn colors(self) -> (&'static str, &'static str) {
        match self {
            Self::Intensity => ("rgba(255, 99, 132, 0.5)", "rgba(255, 99, 132, 1)"),
            Self::Likelihood => ("rgba(54, 162, 235, 0.5)", "rgba(54, 162, 235, 1)"),
            Self::Relevance => ("rgba(75, 192, 192, 0.5)", "rgba(75, 192, 192, 1)"),
        }
    }
}

/// One bar-chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDataset {
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
    /// Absent scores are `null` so positions stay aligned with the labels.
    pub data: Vec<Option<f64>>,
}

/// Bar chart input: one label per record plus three parallel series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesChart {
    pub labels: Vec<Option<String>>,
    pub datasets: Vec<SeriesDataset>,
}

/// Project records into the per-record series input.
pub fn series(records: &[&Record]) -> SeriesChart {
    let labels = records.iter().map(|r| r.country.clone()).collect();
    let datasets = Metric::ALL
        .into_iter()
        .map(|metric| {
            let (fill, border) = metric.colors();
            SeriesDataset {
                label: metric.label().to_string(),
                background_color: fill.to_string(),
                border_color: border.to_string(),
                border_width: 1,
                data: records.iter().map(|r| metric.value_of(r)).collect(),
            }
        })
        .collect();

    SeriesChart { labels, datasets }
}

// ---------------------------------------------------------------------------
// Category counts
// ---------------------------------------------------------------------------

/// Grouping key for a count projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Country,
    Region,
}

impl GroupBy {
    pub fn key_of(self, record: &Record) -> Option<&str> {
        match self {
            Self::Country => record.country.as_deref(),
            Self::Region => record.region.as_deref(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Region => "Region",
        }
    }
}

/// One count dataset with its slot colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountDataset {
    pub data: Vec<usize>,
    /// The palette as configured; its length need not match the label count.
    pub background_color: Vec<String>,
}

/// Doughnut / polar-area input: distinct keys and their record counts.
///
/// Records lacking the key are grouped under a `null` label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub labels: Vec<Option<String>>,
    pub datasets: Vec<CountDataset>,
}

impl CategoryCounts {
    /// Counts aligned with `labels` (empty when there are no datasets).
    pub fn counts(&self) -> &[usize] {
        self.datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or_default()
    }

    /// Sum of all counts; equals the size of the projected subset.
    pub fn total(&self) -> usize {
        self.counts().iter().sum()
    }

    /// Colour of the category at `slot`, reusing the palette round-robin.
    pub fn color_of(&self, slot: usize) -> Option<&str> {
        let colors = &self.datasets.first()?.background_color;
        if colors.is_empty() {
            return None;
        }
        Some(colors[slot % colors.len()].as_str())
    }
}

/// Count records per distinct key, keys in order of first appearance.
pub fn count_by(records: &[&Record], group: GroupBy, palette: &Palette) -> CategoryCounts {
    let mut labels: Vec<Option<String>> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();

    for record in records {
        let key = group.key_of(record);
        match labels.iter().position(|l| l.as_deref() == key) {
            Some(slot) => counts[slot] += 1,
            None => {
                labels.push(key.map(str::to_string));
                counts.push(1);
            }
        }
    }

    CategoryCounts {
        labels,
        datasets: vec![CountDataset {
            data: counts,
            background_color: palette.colors().to_vec(),
        }],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
