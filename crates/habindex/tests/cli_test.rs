#![allow(clippy::unwrap_used)]
// End-to-end CLI tests: spawn the real binary against a wiremock server.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn habindex() -> Command {
    let mut cmd = Command::cargo_bin("habindex").unwrap();
    // Isolate from the invoking environment.
    cmd.env_remove("OPENHAB_BASE_URL")
        .env_remove("OPENHAB_API_TOKEN")
        .env_remove("OPENHAB_PROFILE")
        .env_remove("OPENHAB_DATA_DIR");
    cmd
}

async fn mock_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "8",
            "links": [{ "type": "items", "url": "http://server/rest/items" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "Kitchen",
                "type": "Group",
                "metadata": { "semantics": { "locationType": "Room" } }
            },
            {
                "name": "Kitchen_Light",
                "type": "Switch",
                "groupNames": ["Kitchen"],
                "metadata": { "semantics": { "equipmentType": "Lightbulb" } }
            }
        ])))
        .mount(&server)
        .await;

    server
}

#[test]
fn crawl_requires_a_base_url() {
    habindex()
        .args(["crawl"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No openHAB server configured"));
}

#[test]
fn crawl_rejects_invalid_base_url() {
    habindex()
        .args(["crawl", "--base-url", "not a url"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn crawl_writes_artifacts_and_exits_zero() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(mock_server());
    let dir = tempfile::tempdir().unwrap();

    habindex()
        .args(["crawl", "--base-url", &server.uri()])
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("indexed 2/2 items"));

    assert!(dir.path().join("index.json").exists());
    assert!(dir.path().join("rest_root.json").exists());
    drop(rt);
}

#[test]
fn crawl_fails_nonzero_when_listing_is_down() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        server
    });
    let dir = tempfile::tempdir().unwrap();

    habindex()
        .args(["crawl", "--base-url", &server.uri()])
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .failure();

    assert!(!dir.path().join("index.json").exists());
    drop(rt);
}

#[test]
fn show_summarizes_a_written_index() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(mock_server());
    let dir = tempfile::tempdir().unwrap();

    habindex()
        .args(["crawl", "--base-url", &server.uri()])
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success();

    habindex()
        .args(["show"])
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Kitchen"));

    // Single-item lookup renders the record as JSON.
    habindex()
        .args(["show", "Kitchen_Light", "--output", "json"])
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/rest/items/Kitchen_Light"));
    drop(rt);
}

#[test]
fn show_without_index_gives_actionable_error() {
    let dir = tempfile::tempdir().unwrap();

    habindex()
        .args(["show"])
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("habindex crawl"));
}
