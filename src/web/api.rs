//! JSON API handlers for the dashboard.
//!
//! Filters arrive as query parameters named after the filter fields
//! (`?country=India&start_year=2016`); see [`FilterSet::from_query`].

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use super::{DashboardState, HttpResponse, content_type_json};
use crate::config::DashConfig;
use crate::filter::FilterSet;
use crate::filter::options::FilterOptions;
use crate::model::Record;
use crate::pipeline::{ChartInputs, ChartSpecs};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChartsResponse {
    filters: FilterSet,
    charts: ChartInputs,
    specs: ChartSpecs,
}

#[derive(Serialize)]
struct RecordsResponse<'a> {
    total: usize,
    matched: usize,
    records: Vec<&'a Record>,
}

#[derive(Serialize)]
struct HealthResponse {
    source_url: String,
    /// Whether the initial fetch populated the store.
    loaded: bool,
    records: usize,
    generation: u64,
    cache_entries: usize,
    cache_hits: u64,
    cache_misses: u64,
}

#[derive(Serialize)]
struct ConfigResponse<'a> {
    config: &'a DashConfig,
    toml_text: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/charts?<filters>`: the three chart inputs and their specs.
pub fn get_charts(state: &mut DashboardState, url: &str) -> Result<HttpResponse> {
    let filters = FilterSet::from_query(url);
    let charts = state
        .cache
        .get_or_compute(&state.store, &filters, &state.palette);

    json_response(&ChartsResponse {
        filters,
        charts,
        specs: ChartSpecs::default(),
    })
}

/// `GET /api/records?<filters>`: the filtered records themselves.
pub fn get_records(state: &DashboardState, url: &str) -> Result<HttpResponse> {
    let filters = FilterSet::from_query(url);
    let records = filters.apply(state.store.records());

    json_response(&RecordsResponse {
        total: state.store.len(),
        matched: records.len(),
        records,
    })
}

/// `GET /api/options`: selectable values for each filter control.
pub fn get_options(state: &DashboardState) -> Result<HttpResponse> {
    json_response(&FilterOptions::collect(state.store.records()))
}

/// `GET /api/health`: store and cache status.
pub fn get_health(state: &DashboardState) -> Result<HttpResponse> {
    let (cache_hits, cache_misses) = state.cache.stats();
    json_response(&HealthResponse {
        source_url: state.config.source.url.clone(),
        loaded: state.store.generation() > 0,
        records: state.store.len(),
        generation: state.store.generation(),
        cache_entries: state.cache.len(),
        cache_hits,
        cache_misses,
    })
}

/// `GET /api/config`: effective configuration.
pub fn get_config(state: &DashboardState) -> Result<HttpResponse> {
    let toml_text =
        toml::to_string_pretty(&state.config).context("failed to serialize config as TOML")?;
    json_response(&ConfigResponse {
        config: &state.config,
        toml_text,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
