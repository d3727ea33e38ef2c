//! Record Store: the in-memory dataset for one session.
//!
//! Created empty, populated once by the fetch, and only ever replaced
//! wholesale. The generation number changes on every replacement so derived
//! results (the chart cache) can tell when they are stale.

use std::time::Instant;

use colored::Colorize;

use crate::diagnostics::EventLog;
use crate::model::Record;
use crate::source::DataSource;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    generation: u64,
}

impl RecordStore {
    /// The initial state: no records, generation 0.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut store = Self::empty();
        store.replace(records);
        store
    }

    /// Fetch the dataset once.
    ///
    /// A failed fetch is written to the event log and stderr, and the empty
    /// store is returned. There is no retry and no partial state.
    pub fn load(source: &DataSource, log: &EventLog) -> Self {
        let started = Instant::now();
        match source.fetch() {
            Ok(records) => {
                let latency_ms = started.elapsed().as_millis() as u64;
                log.fetch_ok(source.url(), records.len(), latency_ms);
                Self::from_records(records)
            }
            Err(e) => {
                log.fetch_failed(source.url(), &e);
                eprintln!("{} {e:#}", "Error fetching data:".red().bold());
                Self::empty()
            }
        }
    }

    /// Swap in a new dataset.
    pub fn replace(&mut self, records: Vec<Record>) {
        self.records = records;
        self.generation += 1;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
