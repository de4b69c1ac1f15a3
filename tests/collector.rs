//! End-to-end tests: the collector loop and workbook output against a
//! stub HTTP server.

use std::path::Path;

use address_collector::config::{ApiSettings, OutputSettings, RequestBody, Settings};
use address_collector::{output, AddressCollector};
use calamine::{open_workbook, Reader, Xlsx};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_settings(server_uri: &str, count: usize, dir: &Path) -> Settings {
    Settings {
        api: ApiSettings {
            url: format!("{server_uri}/api/address"),
            ..ApiSettings::default()
        },
        output: OutputSettings {
            directory: dir.to_path_buf(),
            ..OutputSettings::default()
        },
        generator_count: count,
    }
}

fn fixed_response() -> serde_json::Value {
    json!({
        "address": {
            "province": "Guangdong",
            "city": "Shenzhen",
            "county": "Nanshan",
            "address": "1 Main Rd",
        }
    })
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[tokio::test]
async fn collects_one_row_per_successful_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixed_response()))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.uri(), 3, dir.path());
    let records = AddressCollector::new(&settings).unwrap().collect().await.unwrap();

    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.full_address, "GuangdongShenzhenNanshan1 Main Rd");
    }
}

#[tokio::test]
async fn server_error_statuses_produce_no_records() {
    for status in [500u16, 404] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(&server.uri(), 2, dir.path());
        let records = AddressCollector::new(&settings).unwrap().collect().await.unwrap();

        assert!(records.is_empty(), "status {status} must yield no records");
    }
}

#[tokio::test]
async fn response_without_root_key_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.uri(), 2, dir.path());
    let records = AddressCollector::new(&settings).unwrap().collect().await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn zero_count_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixed_response()))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.uri(), 0, dir.path());
    let records = AddressCollector::new(&settings).unwrap().collect().await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn request_carries_configured_headers_and_body() {
    let server = MockServer::start().await;
    // the mock only matches when headers and body are exactly as configured
    Mock::given(method("POST"))
        .and(path("/api/address"))
        .and(header("content-type", "application/json;charset=UTF-8"))
        .and(header("cache-control", "no-cache"))
        .and(body_partial_json(json!({
            "city": "shenzhen",
            "method": "generate",
            "path": "/addr",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixed_response()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut settings = test_settings(&server.uri(), 1, dir.path());
    settings.api.request = RequestBody {
        city_key: "city".to_string(),
        city_value: "shenzhen".to_string(),
        method_key: "method".to_string(),
        method_value: "generate".to_string(),
        path_key: "path".to_string(),
        path_value: "/addr".to_string(),
    };

    let records = AddressCollector::new(&settings).unwrap().collect().await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn full_run_replaces_existing_output_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixed_response()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&server.uri(), 3, dir.path());
    // leftover file from a previous run
    std::fs::write(settings.output.target_path(), b"stale").unwrap();

    let records = AddressCollector::new(&settings).unwrap().collect().await.unwrap();
    output::write_workbook(&records, &settings.output).unwrap();

    let rows = read_rows(&settings.output.target_path());
    assert_eq!(rows.len(), 4);
    for row in &rows[1..] {
        assert_eq!(row[4], "GuangdongShenzhenNanshan1 Main Rd");
        let raw: serde_json::Value = serde_json::from_str(&row[5]).unwrap();
        assert_eq!(raw, fixed_response());
    }
}
