//! insightdash: filter-and-aggregate analytics dashboard for insight records.
//!
//! The record store is fetched once from a JSON endpoint, narrowed by ten
//! conjunctive filters, and projected into a per-record bar series plus
//! record counts per country and per region. The same pipeline backs the web
//! dashboard and the CLI.

pub mod charts;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod web;
