//! Embedded web dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with ten filter controls and three charts
//! - JSON API endpoints for chart inputs, filtered records, filter options,
//!   health and configuration
//!
//! Launched via `insightdash serve` (default: `http://127.0.0.1:9747`).
//! Requests are handled one at a time, so the record store and chart cache
//! live in a plain [`DashboardState`] without locking.

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::charts::Palette;
use crate::config::DashConfig;
use crate::diagnostics::EventLog;
use crate::pipeline::PipelineCache;
use crate::store::RecordStore;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// Everything a request handler can see.
pub struct DashboardState {
    pub store: RecordStore,
    pub cache: PipelineCache,
    pub palette: Palette,
    pub config: DashConfig,
}

impl DashboardState {
    pub fn new(config: DashConfig, store: RecordStore) -> Self {
        Self {
            store,
            cache: PipelineCache::new(config.web.cache_entries),
            palette: Palette::new(&config.charts.palette),
            config,
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on `addr`.
///
/// Blocks the current thread. Per-request errors become 500 responses; they
/// never stop the server.
pub fn serve(addr: &str, mut state: DashboardState, log: &EventLog, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    log.server_start(addr, state.store.len());
    println!("insightdash running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let resp = match dispatch(&mut state, &method, &url) {
            Ok(resp) => resp,
            Err(e) => error_response(&e),
        };
        let status = resp.status_code().0;
        let _ = request.respond(resp);

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route a request to its handler.
pub fn dispatch(state: &mut DashboardState, method: &Method, url: &str) -> Result<HttpResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        (&Method::Get, "/api/charts") => api::get_charts(state, url),
        (&Method::Get, "/api/records") => api::get_records(state, url),
        (&Method::Get, "/api/options") => api::get_options(state),
        (&Method::Get, "/api/health") => api::get_health(state),
        (&Method::Get, "/api/config") => api::get_config(state),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

fn not_found() -> HttpResponse {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

fn error_response(e: &anyhow::Error) -> HttpResponse {
    let body = serde_json::json!({ "error": format!("{e:#}") }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(500))
}

pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
