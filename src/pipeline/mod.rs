//! Filter-and-aggregate pipeline.
//!
//! Narrows the record store with the active Filter Set, then projects the
//! subset into the three chart inputs. Pure and total: the same store and
//! filters always yield the same output, and no input makes it fail.

mod cache;

use serde::Serialize;

use crate::charts::{
    self, CategoryCounts, ChartKind, ChartSpec, GroupBy, Palette, SeriesChart,
};
use crate::filter::FilterSet;
use crate::model::Record;

pub use cache::PipelineCache;

/// Everything the dashboard renders for one Filter Set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartInputs {
    /// Records in the store.
    pub total_records: usize,
    /// Records that passed the filters.
    pub matched_records: usize,
    /// Stacked bar chart: one bar per record.
    pub series: SeriesChart,
    /// Doughnut chart: record count per country.
    pub by_country: CategoryCounts,
    /// Polar-area chart: record count per region.
    pub by_region: CategoryCounts,
}

impl ChartInputs {
    /// Output for a store that has no records yet: no labels, no datasets.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Chart type and options for each of the three inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpecs {
    pub series: ChartSpec,
    pub by_country: ChartSpec,
    pub by_region: ChartSpec,
}

impl Default for ChartSpecs {
    fn default() -> Self {
        Self {
            series: ChartSpec::new(ChartKind::Bar),
            by_country: ChartSpec::new(ChartKind::Doughnut),
            by_region: ChartSpec::new(ChartKind::PolarArea),
        }
    }
}

/// Run the pipeline over a record array.
pub fn compute(records: &[Record], filters: &FilterSet, palette: &Palette) -> ChartInputs {
    if records.is_empty() {
        return ChartInputs::empty();
    }

    let matched = filters.apply(records);

    ChartInputs {
        total_records: records.len(),
        matched_records: matched.len(),
        series: charts::series(&matched),
        by_country: charts::count_by(&matched, GroupBy::Country, palette),
        by_region: charts::count_by(&matched, GroupBy::Region, palette),
    }
}
