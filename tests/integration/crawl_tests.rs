//! Integration tests for the crawler
//!
//! These tests use wiremock to serve wiki pages and drive the full crawl
//! through the plain HTTP engine.

use handbook_scraper::browser::{Browser, Engine, HttpBrowser, LaunchOptions};
use handbook_scraper::config::{Config, KindConfig};
use handbook_scraper::crawler::{run_with_browser, CrawlRequest};
use handbook_scraper::{EntityKind, Record};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_browser() -> Arc<dyn Browser> {
    let options = LaunchOptions {
        engine: Engine::Http,
        headless: true,
        executable: None,
        user_agent: "handbook-scraper-test".to_string(),
        timeout: Some(Duration::from_secs(5)),
    };
    Arc::new(HttpBrowser::new(&options).expect("Failed to build HTTP browser"))
}

/// Creates a test configuration pointing at the mock wiki
fn create_test_config(server: &MockServer, dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.root = server.uri();
    config.site.navigation_timeout_secs = 5;
    config.browser.engine = Engine::Http;
    config.output.image_dir = dir.join("imgs");
    config.output.data_dir = dir.join("static");
    config.output.image_map = dir.join("imgs").join("images.js");

    config.kinds.items = KindConfig {
        seed: "/wiki/Items".to_string(),
        ignore: Vec::new(),
        output_file: "item_data.json".to_string(),
        skip_seed: true,
        single_page: false,
    };
    config.kinds.challenges.seed = "/wiki/Challenges".to_string();
    config
}

/// Mounts an HTML page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, route: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG".to_vec()))
        .expect(times)
        .mount(server)
        .await;
}

fn index_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        r#"<html><body><h1>Items</h1><table class="navbox"><tr><td>{}</td></tr></table></body></html>"#,
        anchors
    )
}

fn item_page(name: &str, rarity: Option<&str>, image: Option<&str>) -> String {
    let rarity = rarity
        .map(|r| format!(r#"<div data-source="rarity"><div class="pi-data-value">{}</div></div>"#, r))
        .unwrap_or_default();
    let image = image
        .map(|src| {
            format!(
                r#"<figure><img class="pi-image-thumbnail" src="{}" data-image-name="{}.png"></figure>"#,
                src, name
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body>
        <aside class="portable-infobox">
          <h2 data-source="title">{}</h2>
          {}
          <div data-source="desc"><div class="pi-data-value">Does things.</div></div>
          {}
        </aside>
        </body></html>"#,
        name, image, rarity
    )
}

fn item(record: &Record) -> &handbook_scraper::extract::ItemRecord {
    match record {
        Record::Item(item) => item,
        other => panic!("expected an item, got {:?}", other),
    }
}

#[tokio::test]
async fn test_batch_crawl_keys_records_by_name() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/wiki/Items", index_page(&["/wiki/Crowbar", "/wiki/Gasoline", "/wiki/Tri-Tip_Dagger"]), 1).await;
    mount_page(&server, "/wiki/Crowbar", item_page("Crowbar", Some("Common"), None), 1).await;
    mount_page(&server, "/wiki/Gasoline", item_page("Gasoline", Some("Common"), None), 1).await;
    mount_page(&server, "/wiki/Tri-Tip_Dagger", item_page("Tri-Tip Dagger", Some("Common"), None), 1).await;

    let config = create_test_config(&server, dir.path());
    let outcome = run_with_browser(&config, &CrawlRequest::new(EntityKind::Item), http_browser())
        .await
        .expect("Crawl failed");

    let names: Vec<&str> = outcome.dataset.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Crowbar", "Gasoline", "Tri-Tip Dagger"]);
    assert_eq!(outcome.report.visited, 3);
    assert!(!outcome.report.empty_discovery);
    assert!(item(&outcome.dataset["Crowbar"]).wiki_url.ends_with("/wiki/Crowbar"));
}

#[tokio::test]
async fn test_duplicate_links_and_seed_visited_once() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(
        &server,
        "/wiki/Items",
        index_page(&["/wiki/Crowbar", "/wiki/Crowbar", "/wiki/Items", "/wiki/Crowbar?utm_source=nav"]),
        2,
    )
    .await;
    mount_page(&server, "/wiki/Crowbar", item_page("Crowbar", None, None), 1).await;

    let mut config = create_test_config(&server, dir.path());
    config.kinds.items.skip_seed = false;

    let outcome = run_with_browser(&config, &CrawlRequest::new(EntityKind::Item), http_browser())
        .await
        .expect("Crawl failed");

    // Crowbar and the seed itself (which has no infobox title)
    assert_eq!(outcome.report.visited, 2);
    assert_eq!(outcome.report.duplicates, 2);
    assert_eq!(outcome.dataset.len(), 1);
}

#[tokio::test]
async fn test_ignored_pages_never_extracted() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/wiki/Items", index_page(&["/wiki/Crowbar", "/wiki/Lunar", "/wiki/Equipment#Elite"]), 1).await;
    mount_page(&server, "/wiki/Crowbar", item_page("Crowbar", None, None), 1).await;
    mount_page(&server, "/wiki/Lunar", item_page("Lunar", None, None), 0).await;

    let mut config = create_test_config(&server, dir.path());
    config.kinds.items.ignore = vec!["/wiki/Lunar".to_string(), "/wiki/Equipment*".to_string()];

    let outcome = run_with_browser(&config, &CrawlRequest::new(EntityKind::Item), http_browser())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.dataset.keys().collect::<Vec<_>>(), vec!["Crowbar"]);
    assert_eq!(outcome.report.ignored, 2);
}

#[tokio::test]
async fn test_empty_discovery_completes() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/wiki/Items", "<html><body><p>Redesigned page</p></body></html>".to_string(), 1).await;

    let config = create_test_config(&server, dir.path());
    let outcome = run_with_browser(&config, &CrawlRequest::new(EntityKind::Item), http_browser())
        .await
        .expect("Crawl failed");

    assert!(outcome.dataset.is_empty());
    assert!(outcome.report.empty_discovery);
}

#[tokio::test]
async fn test_missing_field_is_omitted() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/wiki/Crowbar", item_page("Crowbar", None, None), 1).await;

    let config = create_test_config(&server, dir.path());
    let request = CrawlRequest {
        kind: EntityKind::Item,
        seed: Some(format!("{}/wiki/Crowbar", server.uri())),
        single: true,
    };
    let outcome = run_with_browser(&config, &request, http_browser())
        .await
        .expect("Crawl failed");

    let json = serde_json::to_value(&outcome.dataset["Crowbar"]).unwrap();
    assert_eq!(json["description"], "Does things.");
    assert!(json.get("rarity").is_none());
    assert!(json.get("imgUrl").is_none());
}

#[tokio::test]
async fn test_stat_rows_shorter_than_header_dropped() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let page = r#"<html><body>
        <aside class="portable-infobox">
          <h2 data-source="title">Soldier's Syringe</h2>
          <table>
            <tr><th data-source="stat1">Stat</th><th>Value</th><th>Stack Type</th><th>Add</th></tr>
            <tr><td data-source="stat2">Attack Speed</td><td>15%</td><td>Linear</td></tr>
            <tr><td data-source="stat3">Attack Speed</td><td>15%</td><td>Linear</td><td>+15%</td></tr>
          </table>
        </aside>
        </body></html>"#;
    mount_page(&server, "/wiki/Soldier%27s_Syringe", page.to_string(), 1).await;

    let config = create_test_config(&server, dir.path());
    let request = CrawlRequest {
        kind: EntityKind::Item,
        seed: Some("/wiki/Soldier%27s_Syringe".to_string()),
        single: true,
    };
    let outcome = run_with_browser(&config, &request, http_browser())
        .await
        .expect("Crawl failed");

    let stats = &item(&outcome.dataset["Soldier's Syringe"]).stats;
    assert_eq!(stats.len(), 1);
    assert_eq!(
        stats[0].keys().collect::<Vec<_>>(),
        vec!["stat", "value", "stackType", "add"]
    );
    assert_eq!(stats[0].get("add"), Some("+15%"));
}

#[tokio::test]
async fn test_challenge_tables_assign_categories_by_position() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let table = |rows: &[(&str, &str)]| {
        let body: String = rows
            .iter()
            .map(|(name, unlock)| {
                format!(
                    "<tr><td></td><td>{}</td><td>Do the thing.</td><td>{}</td></tr>",
                    name, unlock
                )
            })
            .collect();
        format!(
            r#"<table class="article-table"><tr><th>Icon</th><th>Name</th><th>Description</th><th>Unlock</th></tr>{}</table>"#,
            body
        )
    };
    let page = format!(
        "<html><body>{}{}</body></html>",
        table(&[("Warrior", "Mercenary"), ("Pathfinder", "Huntress")]),
        table(&[("Cleanup Duty", "Wax Quail"), ("Keyed Up", "Rusted Key")])
    );
    mount_page(&server, "/wiki/Challenges", page, 1).await;

    let config = create_test_config(&server, dir.path());
    let request = CrawlRequest {
        kind: EntityKind::Challenge,
        seed: None,
        single: true,
    };
    let outcome = run_with_browser(&config, &request, http_browser())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.dataset.len(), 4);
    let category = |name: &str| match &outcome.dataset[name] {
        Record::Challenge(c) => c.category.clone(),
        other => panic!("expected a challenge, got {:?}", other),
    };
    assert_eq!(category("Warrior"), "survivors");
    assert_eq!(category("Pathfinder"), "survivors");
    assert_eq!(category("Cleanup Duty"), "items");
    assert_eq!(category("Keyed Up"), "items");
}

#[tokio::test]
async fn test_images_downloaded_once_across_runs() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/wiki/Crowbar", item_page("Crowbar", None, Some("/images/Crowbar.png")), 2).await;
    mount_image(&server, "/images/Crowbar.png", 1).await;

    let config = create_test_config(&server, dir.path());
    let request = CrawlRequest {
        kind: EntityKind::Item,
        seed: Some("/wiki/Crowbar".to_string()),
        single: true,
    };

    let first = run_with_browser(&config, &request, http_browser()).await.expect("First crawl failed");
    assert_eq!(first.report.images_downloaded, 1);
    assert!(dir.path().join("imgs").join("Crowbar.png").exists());

    let second = run_with_browser(&config, &request, http_browser()).await.expect("Second crawl failed");
    assert_eq!(second.report.images_downloaded, 0);
    assert_eq!(second.report.images_cached, 1);

    let image = item(&second.dataset["Crowbar"]).image.clone().unwrap();
    assert_eq!(image.img_name, "Crowbar.png");
    assert_eq!(image.img_url, format!("{}/images/Crowbar.png", server.uri()));
}

#[tokio::test]
async fn test_broken_image_keeps_record() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/wiki/Crowbar", item_page("Crowbar", Some("Common"), Some("/images/Missing.png")), 1).await;

    let config = create_test_config(&server, dir.path());
    let request = CrawlRequest {
        kind: EntityKind::Item,
        seed: Some("/wiki/Crowbar".to_string()),
        single: true,
    };
    let outcome = run_with_browser(&config, &request, http_browser())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.report.images_failed, vec!["Crowbar.png"]);
    let crowbar = item(&outcome.dataset["Crowbar"]);
    assert_eq!(crowbar.rarity.as_deref(), Some("Common"));
    assert!(crowbar.image.is_some());
}

#[tokio::test]
async fn test_failed_page_aborts_crawl() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&server, "/wiki/Items", index_page(&["/wiki/Crowbar", "/wiki/Gone"]), 1).await;
    mount_page(&server, "/wiki/Crowbar", item_page("Crowbar", None, None), 1).await;

    let config = create_test_config(&server, dir.path());
    let result = run_with_browser(&config, &CrawlRequest::new(EntityKind::Item), http_browser()).await;

    assert!(result.is_err());
}
