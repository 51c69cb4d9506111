#![allow(clippy::unwrap_used)]
// End-to-end crawl tests against a wiremock server.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use habindex_core::{CrawlError, Crawler, CrawlerConfig, Index, RootInfo};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer, data_dir: &std::path::Path) -> CrawlerConfig {
    let mut config = CrawlerConfig::new(Url::parse(&server.uri()).unwrap());
    config.data_dir = data_dir.to_owned();
    config
}

fn root_body() -> serde_json::Value {
    json!({
        "version": "8",
        "locale": "en_US",
        "runtimeInfo": { "version": "4.1.0" },
        "links": [
            { "type": "items", "url": "http://server/rest/items" }
        ]
    })
}

fn kitchen_listing() -> serde_json::Value {
    json!([
        {
            "name": "Kitchen_Light",
            "label": "Kitchen light",
            "type": "Switch",
            "tags": ["Light"],
            "groupNames": ["Kitchen"],
            "metadata": { "semantics": { "equipmentType": "Lightbulb" } }
        },
        {
            "name": "Kitchen",
            "label": "Kitchen",
            "type": "Group",
            "metadata": { "semantics": { "locationType": "Room" } }
        }
    ])
}

async fn mount_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(root_body()))
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn full_crawl_writes_both_artifacts() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_root(&server).await;
    mount_listing(&server, kitchen_listing()).await;

    let config = config_for(&server, dir.path());
    let crawler = Crawler::new(config).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.items_listed, 2);
    assert_eq!(summary.items_indexed, 2);
    assert_eq!(summary.invalid_items, 0);
    assert_eq!(summary.tree_roots, 1);

    let index = Index::load(&dir.path().join("index.json")).unwrap();
    assert_eq!(index.items_by_name.len(), 2);
    assert_eq!(
        index.items_by_name["Kitchen_Light"].rest_url,
        "/rest/items/Kitchen_Light"
    );
    assert!(index.items_by_name["Kitchen"].semantic.is_location);

    let root = &index.semantic_tree.locations[0];
    assert_eq!(root.item, "Kitchen");
    assert_eq!(root.equipment[0].item, "Kitchen_Light");

    let root_info = RootInfo::load(&dir.path().join("rest_root.json")).unwrap();
    assert_eq!(root_info.endpoint("items"), Some("http://server/rest/items"));
    assert_eq!(root_info.runtime_info["locale"], json!("en_US"));
}

#[tokio::test]
async fn crawl_is_idempotent_for_unchanged_source() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_root(&server).await;
    mount_listing(&server, kitchen_listing()).await;

    let crawler = Crawler::new(config_for(&server, dir.path())).unwrap();

    crawler.run().await.unwrap();
    let first = Index::load(&dir.path().join("index.json")).unwrap();

    crawler.run().await.unwrap();
    let second = Index::load(&dir.path().join("index.json")).unwrap();

    assert_eq!(first.items_by_name, second.items_by_name);
    assert_eq!(first.semantic_tree, second.semantic_tree);
}

// ── Item-level resilience ───────────────────────────────────────────

#[tokio::test]
async fn invalid_item_is_skipped_not_fatal() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_root(&server).await;
    mount_listing(
        &server,
        json!([
            { "name": "", "type": "Switch" },
            { "name": "Valid_Item", "type": "Switch" }
        ]),
    )
    .await;

    let crawler = Crawler::new(config_for(&server, dir.path())).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.items_listed, 2);
    assert_eq!(summary.invalid_items, 1);
    assert_eq!(summary.items_indexed, 1);

    let index = Index::load(&dir.path().join("index.json")).unwrap();
    assert!(index.items_by_name.contains_key("Valid_Item"));
}

#[tokio::test]
async fn malformed_root_degrades_but_crawl_continues() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;
    mount_listing(&server, kitchen_listing()).await;

    let crawler = Crawler::new(config_for(&server, dir.path())).unwrap();
    let summary = crawler.run().await.unwrap();

    assert!(summary.root_info_degraded);
    assert_eq!(summary.items_indexed, 2);

    let root_info = RootInfo::load(&dir.path().join("rest_root.json")).unwrap();
    assert!(root_info.endpoint_map.is_empty());
}

// ── Whole-run failures ──────────────────────────────────────────────

#[tokio::test]
async fn persistent_root_server_error_fails_run_without_artifacts() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = Crawler::new(config_for(&server, dir.path())).unwrap();
    let result = crawler.run().await;

    assert!(
        matches!(result, Err(CrawlError::Api(_))),
        "expected Api error, got: {result:?}"
    );
    assert!(!dir.path().join("index.json").exists());
    assert!(!dir.path().join("rest_root.json").exists());
}

#[tokio::test]
async fn listing_failure_preserves_previous_snapshot() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_root(&server).await;
    mount_listing(&server, kitchen_listing()).await;

    let crawler = Crawler::new(config_for(&server, dir.path())).unwrap();
    crawler.run().await.unwrap();
    let before = Index::load(&dir.path().join("index.json")).unwrap();

    // Second run: the listing now serves only errors.
    server.reset().await;
    mount_root(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/items"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = crawler.run().await;
    assert!(result.is_err());

    let after = Index::load(&dir.path().join("index.json")).unwrap();
    assert_eq!(before.items_by_name, after.items_by_name);
    assert_eq!(before.generated_at, after.generated_at);
}

#[tokio::test]
async fn auth_rejection_fails_fast() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // A retried 401 would exceed `expect(1)`.
    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(config_for(&server, dir.path())).unwrap();
    let result = crawler.run().await;

    match result {
        Err(CrawlError::Api(err)) => assert!(err.is_auth()),
        other => panic!("expected auth failure, got: {other:?}"),
    }
}

// ── Detail enrichment ───────────────────────────────────────────────

#[tokio::test]
async fn detail_fetch_enriches_and_tolerates_failures() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_root(&server).await;
    mount_listing(
        &server,
        json!([
            { "name": "Lamp", "type": "Switch", "label": "from listing" },
            { "name": "Broken", "type": "Switch", "label": "from listing" }
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/rest/items/Lamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Lamp",
            "type": "Switch",
            "label": "from detail",
            "tags": ["Light"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/items/Broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = config_for(&server, dir.path());
    config.fetch_details = true;
    config.concurrency = 2;

    let crawler = Crawler::new(config).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.detail_failures, 1);

    let index = Index::load(&dir.path().join("index.json")).unwrap();
    assert_eq!(
        index.items_by_name["Lamp"].label.as_deref(),
        Some("from detail")
    );
    // The failed detail keeps the listing record.
    assert_eq!(
        index.items_by_name["Broken"].label.as_deref(),
        Some("from listing")
    );
}
