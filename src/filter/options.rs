//! Selection-control options: the distinct values observed per filter field.

use std::collections::HashSet;

use serde::Serialize;

use super::FilterField;
use crate::model::Record;

/// Distinct values for one filter control, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOptions {
    pub field: FilterField,
    pub label: &'static str,
    pub values: Vec<String>,
}

/// Options for all ten controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub fields: Vec<FieldOptions>,
}

impl FilterOptions {
    /// Collect options from the record store. Absent and empty values are
    /// skipped, since an empty selection means "All"; topics are flattened
    /// across records.
    pub fn collect(records: &[Record]) -> Self {
        let fields = FilterField::ALL
            .into_iter()
            .map(|field| FieldOptions {
                field,
                label: field.label(),
                values: distinct(records.iter().flat_map(|r| values_of(field, r))),
            })
            .collect();
        Self { fields }
    }

    pub fn values(&self, field: FilterField) -> &[String] {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.values.as_slice())
            .unwrap_or_default()
    }
}

fn values_of(field: FilterField, record: &Record) -> Vec<String> {
    match field {
        FilterField::StartYear => record.start_year.iter().map(i32::to_string).collect(),
        FilterField::EndYear => record.end_year.iter().map(i32::to_string).collect(),
        FilterField::Topic => record
            .topics
            .iter()
            .filter(|t| !t.is_empty())
            .cloned()
            .collect(),
        _ => field
            .text_of(record)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .into_iter()
            .collect(),
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}
