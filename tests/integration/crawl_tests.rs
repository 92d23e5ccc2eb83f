//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a fake paginated catalog and run the
//! full crawl with the HTTP fetcher, the CSV dataset and the JSON cursor file.

use listing_harvester::config::{CatalogConfig, Config, OutputConfig, UserAgentConfig};
use listing_harvester::crawler::run_crawl;
use listing_harvester::output::DATASET_HEADER;
use listing_harvester::{HarvestError, StopReason};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG_PATH: &str = "/imobiliare/apartamente/";

/// Creates a test configuration pointing at the mock catalog
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        catalog: CatalogConfig {
            url_template: format!("{}{}?currency=EUR&page={{page}}", base_url, CATALOG_PATH),
            max_pages: 5,
            settle_ms: 0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            state_path: path_string(dir.path().join("stare.json")),
            dataset_path: path_string(dir.path().join("anunturi.csv")),
        },
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

/// Renders a catalog page with `cards` listing cards
fn catalog_page(page: u32, cards: usize) -> String {
    let mut html = String::from("<html><head><title>Apartamente</title></head><body>");
    for i in 0..cards {
        html.push_str(&format!(
            r#"<div data-cy="l-card">
                <a href="/d/oferta/anunt-{page}-{i}.html"><h6>Apartament {page}-{i}</h6></a>
                <p data-testid="ad-price">{price} €</p>
                <p data-testid="location-date">Bucuresti, Sectorul 3 - Azi la 09:30</p>
                <span data-testid="ad-meta">Negociabil</span>
                <div color="text-global-secondary">{area} m² - etaj 2</div>
            </div>"#,
            page = page,
            i = i,
            price = 60_000 + i * 500,
            area = 50 + i,
        ));
    }
    html.push_str("</body></html>");
    html
}

/// Mounts one catalog page on the mock server, expected to be fetched `times` times
async fn mount_page(server: &MockServer, page: u32, cards: usize, times: u64) {
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(catalog_page(page, cards))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn read_dataset(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("dataset should exist");
    reader
        .records()
        .map(|row| row.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn read_cursor(config: &Config) -> String {
    std::fs::read_to_string(&config.output.state_path).expect("cursor file should exist")
}

#[tokio::test]
async fn test_first_run_single_page_then_end_of_catalog() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, 1, 3, 1).await;
    mount_page(&mock_server, 2, 0, 1).await;

    let config = create_test_config(&mock_server.uri(), &dir);
    assert!(!Path::new(&config.output.state_path).exists());

    let summary = run_crawl(&config).await.expect("crawl should succeed");

    assert_eq!(summary.start_page, 1);
    assert_eq!(summary.pages_processed, 1);
    assert_eq!(summary.records_appended, 3);
    assert_eq!(summary.stop_reason, Some(StopReason::EndOfCatalog));

    let rows = read_dataset(Path::new(&config.output.dataset_path));
    assert_eq!(rows.len(), 4, "one header row and three data rows");
    assert_eq!(rows[0], DATASET_HEADER);
    assert_eq!(
        rows[1],
        vec![
            "Apartament 1-0".to_string(),
            "60000 €".to_string(),
            "Bucuresti, Sectorul 3".to_string(),
            "50 m²".to_string(),
            format!("{}/d/oferta/anunt-1-0.html", mock_server.uri()),
        ]
    );

    assert_eq!(read_cursor(&config), r#"{"page":2}"#);
}

#[tokio::test]
async fn test_resume_from_saved_cursor() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    std::fs::write(&config.output.state_path, r#"{"page":3}"#).unwrap();

    mount_page(&mock_server, 1, 2, 0).await;
    mount_page(&mock_server, 2, 2, 0).await;
    mount_page(&mock_server, 3, 2, 1).await;
    mount_page(&mock_server, 4, 0, 1).await;

    let summary = run_crawl(&config).await.expect("crawl should succeed");

    assert_eq!(summary.start_page, 3);
    assert_eq!(summary.records_appended, 2);
    assert_eq!(read_cursor(&config), r#"{"page":4}"#);
}

#[tokio::test]
async fn test_never_fetches_past_page_limit() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for page in 1..=5 {
        mount_page(&mock_server, page, 2, 1).await;
    }
    mount_page(&mock_server, 6, 2, 0).await;

    let config = create_test_config(&mock_server.uri(), &dir);
    let summary = run_crawl(&config).await.expect("crawl should succeed");

    assert_eq!(summary.pages_processed, 5);
    assert_eq!(summary.stop_reason, Some(StopReason::SafetyCutoff));
    assert_eq!(read_cursor(&config), r#"{"page":6}"#);

    // A later run starts past the limit and fetches nothing
    let summary = run_crawl(&config).await.expect("second run should succeed");
    assert_eq!(summary.pages_processed, 0);
    assert_eq!(summary.stop_reason, Some(StopReason::SafetyCutoff));

    let rows = read_dataset(Path::new(&config.output.dataset_path));
    assert_eq!(rows.len(), 11);
}

#[tokio::test]
async fn test_header_written_once_across_runs() {
    let dir = TempDir::new().unwrap();

    let first_server = MockServer::start().await;
    mount_page(&first_server, 1, 2, 1).await;
    mount_page(&first_server, 2, 0, 1).await;
    let config = create_test_config(&first_server.uri(), &dir);
    run_crawl(&config).await.expect("first run should succeed");

    // The catalog grew: page 2 now has listings
    let second_server = MockServer::start().await;
    mount_page(&second_server, 1, 2, 0).await;
    mount_page(&second_server, 2, 1, 1).await;
    mount_page(&second_server, 3, 0, 1).await;
    let config = create_test_config(&second_server.uri(), &dir);
    run_crawl(&config).await.expect("second run should succeed");

    let rows = read_dataset(Path::new(&config.output.dataset_path));
    let header_rows = rows
        .iter()
        .filter(|row| row.as_slice() == DATASET_HEADER)
        .count();
    assert_eq!(header_rows, 1);
    assert_eq!(rows[0], DATASET_HEADER);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3][0], "Apartament 2-0");
    assert_eq!(read_cursor(&config), r#"{"page":3}"#);
}

#[tokio::test]
async fn test_not_found_page_ends_catalog() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, 1, 2, 1).await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("<html><body><h1>Pagina nu a fost gasita</h1></body></html>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir);
    let summary = run_crawl(&config).await.expect("crawl should succeed");

    assert_eq!(summary.pages_processed, 1);
    assert_eq!(summary.stop_reason, Some(StopReason::EndOfCatalog));
    assert_eq!(read_cursor(&config), r#"{"page":2}"#);
    assert_eq!(read_dataset(Path::new(&config.output.dataset_path)).len(), 3);
}

#[tokio::test]
async fn test_server_error_page_ends_catalog() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir);
    let summary = run_crawl(&config).await.expect("crawl should succeed");

    assert_eq!(summary.pages_processed, 0);
    assert_eq!(summary.stop_reason, Some(StopReason::EndOfCatalog));
    assert_eq!(read_cursor(&config), r#"{"page":1}"#);
    assert!(!Path::new(&config.output.dataset_path).exists());
}

/// Returns a base URL nothing is listening on
fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_unreachable_catalog_is_fatal_and_page_is_retried() {
    let dir = TempDir::new().unwrap();

    let config = create_test_config(&unreachable_base_url(), &dir);
    std::fs::write(&config.output.state_path, r#"{"page":2}"#).unwrap();

    let err = run_crawl(&config).await.expect_err("crawl should fail");

    assert!(matches!(err, HarvestError::Http { .. }));
    assert!(err.is_fetch_failure());
    assert_eq!(read_cursor(&config), r#"{"page":2}"#);
    assert!(!Path::new(&config.output.dataset_path).exists());

    let healthy_server = MockServer::start().await;
    mount_page(&healthy_server, 1, 2, 0).await;
    mount_page(&healthy_server, 2, 2, 1).await;
    mount_page(&healthy_server, 3, 0, 1).await;

    let config = create_test_config(&healthy_server.uri(), &dir);
    let summary = run_crawl(&config).await.expect("retry should succeed");

    assert_eq!(summary.start_page, 2);
    assert_eq!(read_cursor(&config), r#"{"page":3}"#);
    assert_eq!(read_dataset(Path::new(&config.output.dataset_path)).len(), 3);
}

#[tokio::test]
async fn test_corrupt_cursor_aborts_before_fetching() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page(1, 1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &dir);
    std::fs::write(&config.output.state_path, "{\"page\": 2,").unwrap();

    let err = run_crawl(&config).await.expect_err("crawl should fail");

    assert!(matches!(err, HarvestError::CorruptState { .. }));
    assert!(!Path::new(&config.output.dataset_path).exists());
}

#[tokio::test]
async fn test_missing_page_field_starts_from_first_page() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, 1, 1, 1).await;
    mount_page(&mock_server, 2, 0, 1).await;

    let config = create_test_config(&mock_server.uri(), &dir);
    std::fs::write(&config.output.state_path, r#"{"pagina":4}"#).unwrap();

    let summary = run_crawl(&config).await.expect("crawl should succeed");

    assert_eq!(summary.start_page, 1);
    assert_eq!(read_cursor(&config), r#"{"page":2}"#);
}
