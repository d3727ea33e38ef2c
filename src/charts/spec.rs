//! Chart type and option declarations handed to the frontend renderer.

use serde::Serialize;

/// Chart types used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Doughnut,
    PolarArea,
}

/// One axis: stacked and starting at zero on every dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    pub stacked: bool,
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scales {
    pub x: AxisOptions,
    pub y: AxisOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub scales: Scales,
}

impl Default for ChartOptions {
    fn default() -> Self {
        let axis = AxisOptions {
            stacked: true,
            begin_at_zero: true,
        };
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            scales: Scales {
                x: axis.clone(),
                y: axis,
            },
        }
    }
}

/// Type plus options for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub options: ChartOptions,
}

impl ChartSpec {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            options: ChartOptions::default(),
        }
    }
}
