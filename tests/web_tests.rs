/// Dashboard server tests.
///
/// Drives the request router directly, and loads the store from a local
/// `tiny_http` endpoint standing in for the record feed.
use std::io::Read;
use std::thread;

use insightdash::config::{DashConfig, SourceConfig};
use insightdash::diagnostics::EventLog;
use insightdash::source::DataSource;
use insightdash::store::RecordStore;
use insightdash::web::{DashboardState, HttpResponse, dispatch};
use tiny_http::{Method, Response, Server, StatusCode};

const FEED: &str = r#"[
    {"startyear": 2016, "endyear": 2018, "topics": ["oil"], "region": "Northern America",
     "country": "United States of America", "intensity": 6, "likelihood": 3, "relevance": 2},
    {"startyear": 2017, "endyear": 2017, "topics": ["policy"], "region": "Southern Asia",
     "country": "India", "intensity": 4, "likelihood": 2, "relevance": 1},
    {"topics": ["policy"], "region": "Southern Asia", "country": "India", "intensity": 9}
]"#;

/// Serve one canned response on an ephemeral port; returns the base URL.
fn one_shot_feed(status: u16, body: &'static str) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let resp = Response::from_string(body).with_status_code(StatusCode(status));
            let _ = request.respond(resp);
        }
    });
    format!("http://{addr}/getdata")
}

fn source_for(url: String) -> DataSource {
    DataSource::from_config(&SourceConfig {
        url,
        timeout_ms: 5000,
    })
}

fn json(resp: HttpResponse) -> serde_json::Value {
    let mut out = String::new();
    resp.into_reader().read_to_string(&mut out).unwrap();
    serde_json::from_str(&out).unwrap()
}

fn loaded_state() -> DashboardState {
    let store = RecordStore::load(&source_for(one_shot_feed(200, FEED)), &EventLog::disabled());
    DashboardState::new(DashConfig::default(), store)
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

#[test]
fn fetch_parses_the_record_array() {
    let records = source_for(one_shot_feed(200, FEED)).fetch().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].country.as_deref(), Some("India"));
    assert_eq!(records[2].start_year, None);
}

#[test]
fn non_success_status_is_an_error() {
    let err = source_for(one_shot_feed(503, "unavailable"))
        .fetch()
        .unwrap_err();
    assert!(format!("{err:#}").contains("GET"));
}

#[test]
fn failed_load_leaves_store_empty() {
    let store = RecordStore::load(
        &source_for(one_shot_feed(500, "oops")),
        &EventLog::disabled(),
    );
    assert!(store.is_empty());
    assert_eq!(store.generation(), 0);
}

#[test]
fn odd_element_does_not_empty_the_store() {
    let feed = r#"[{"country": 5}, {"startyear": 2015, "start_year": 2016}, {"country": "USA"}]"#;
    let store = RecordStore::load(&source_for(one_shot_feed(200, feed)), &EventLog::disabled());
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[0].country.as_deref(), Some("5"));
    assert_eq!(store.records()[1].country.as_deref(), Some("USA"));
}

#[test]
fn malformed_body_is_an_error() {
    let result = source_for(one_shot_feed(200, r#"{"not": "an array"}"#)).fetch();
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[test]
fn charts_endpoint_filters_and_projects() {
    let mut state = loaded_state();
    let body = json(dispatch(&mut state, &Method::Get, "/api/charts?topic=policy").unwrap());

    let charts = &body["charts"];
    assert_eq!(charts["total_records"], 3);
    assert_eq!(charts["matched_records"], 2);
    assert_eq!(charts["by_country"]["labels"], serde_json::json!(["India"]));
    assert_eq!(charts["by_country"]["datasets"][0]["data"], serde_json::json!([2]));
    assert_eq!(
        charts["series"]["datasets"][0]["data"],
        serde_json::json!([4.0, 9.0])
    );
    assert_eq!(body["specs"]["series"]["type"], "bar");
    assert_eq!(body["specs"]["by_country"]["type"], "doughnut");
}

#[test]
fn year_filters_arrive_as_query_parameters() {
    let mut state = loaded_state();
    let url = "/api/records?start_year=2016&end_year=2018";
    let body = json(dispatch(&mut state, &Method::Get, url).unwrap());
    assert_eq!(body["matched"], 2);

    let body = json(dispatch(&mut state, &Method::Get, "/api/records?start_year=2017").unwrap());
    assert_eq!(body["matched"], 1);
    assert_eq!(body["records"][0]["country"], "India");
}

#[test]
fn percent_encoded_values_are_decoded() {
    let mut state = loaded_state();
    let url = "/api/charts?country=United%20States+of+America";
    let body = json(dispatch(&mut state, &Method::Get, url).unwrap());
    assert_eq!(body["filters"]["country"], "United States of America");
    assert_eq!(body["charts"]["matched_records"], 1);
}

#[test]
fn malformed_year_in_query_is_ignored() {
    let mut state = loaded_state();
    let body = json(dispatch(&mut state, &Method::Get, "/api/records?start_year=soon").unwrap());
    assert_eq!(body["matched"], 3);
}

#[test]
fn empty_store_serves_empty_charts() {
    let mut state = DashboardState::new(DashConfig::default(), RecordStore::empty());
    let body = json(dispatch(&mut state, &Method::Get, "/api/charts").unwrap());
    assert_eq!(body["charts"]["series"]["labels"], serde_json::json!([]));
    assert_eq!(body["charts"]["series"]["datasets"], serde_json::json!([]));
    assert_eq!(body["charts"]["by_region"]["datasets"], serde_json::json!([]));

    let health = json(dispatch(&mut state, &Method::Get, "/api/health").unwrap());
    assert_eq!(health["loaded"], false);
}

#[test]
fn options_are_distinct_in_first_seen_order() {
    let mut state = loaded_state();
    let body = json(dispatch(&mut state, &Method::Get, "/api/options").unwrap());
    let country = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["field"] == "country")
        .unwrap();
    assert_eq!(
        country["values"],
        serde_json::json!(["United States of America", "India"])
    );
}

#[test]
fn unknown_route_is_404() {
    let mut state = DashboardState::new(DashConfig::default(), RecordStore::empty());
    let resp = dispatch(&mut state, &Method::Get, "/api/reload").unwrap();
    assert_eq!(resp.status_code().0, 404);
}
