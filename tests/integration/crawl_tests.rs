//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the Drive, Docs, Sheets and Slides
//! APIs and run the full crawl cycle end-to-end.

use paper_chaser::config::{
    AuthConfig, Config, CrawlerConfig, EndpointConfig, HttpConfig, OutputConfig,
};
use paper_chaser::crawler::{crawl, ShutdownSignal};
use paper_chaser::links::resolve_ids;
use paper_chaser::output::results_path;
use paper_chaser::state::{frontier_path, load_ids, visited_path};
use paper_chaser::{ChaserError, CrawlState};
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const FOLDER_ID: &str = "0B_folder_aaaaaaaaaaaaaaaaaaaaa";
const DOC_ID: &str = "1doc_bbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const SHEET_ID: &str = "1sheet_cccccccccccccccccccccccccc";
const SLIDES_ID: &str = "1slides_ddddddddddddddddddddddddd";
const PRIVATE_ID: &str = "1private_eeeeeeeeeeeeeeeeeeeeeeee";
const PDF_ID: &str = "0B_pdf_ffffffffffffffffffffffffff";

const TOKEN: &str = "test-token";

const INVALID_TOKEN: &str =
    "Bearer realm=\"https://accounts.google.com/\", error=\"invalid_token\"";

/// Matches folder listing requests without a page token
struct FirstPage;

impl Match for FirstPage {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "pageToken")
    }
}

/// Creates a test configuration pointing every API at the mock server
fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
    Config {
        auth: AuthConfig {
            access_token: TOKEN.to_string(),
        },
        http: HttpConfig {
            user_agent: "paperchaser-test".to_string(),
            timeout_secs: 5,
            ..Default::default()
        },
        crawler: CrawlerConfig::default(),
        output: OutputConfig {
            directory: output_dir.display().to_string(),
        },
        endpoints: EndpointConfig::all(base_url),
    }
}

fn metadata(id: &str, title: &str, mime_type: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "mimeType": mime_type,
        "createdDate": "2020-01-01T00:00:00.000Z",
        "modifiedDate": "2020-06-01T00:00:00.000Z",
        "version": "3",
        "parents": [{"id": "root_folder"}],
        "userPermission": {"id": "me", "role": "writer"},
        "owners": [{"emailAddress": "owner@example.com", "displayName": "Owner"}],
        "capabilities": {"canEdit": true},
        "explicitlyTrashed": false
    })
}

async fn mount_metadata(server: &MockServer, id: &str, title: &str, mime_type: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}", id)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata(id, title, mime_type)))
        .mount(server)
        .await;
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open results CSV");
    reader
        .records()
        .map(|record| {
            record
                .expect("Failed to read CSV row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_full_crawl_follows_links() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    // Folder with two pages of children
    mount_metadata(&mock_server, FOLDER_ID, "Shared", "application/vnd.google-apps.folder").await;
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}/children", FOLDER_ID)))
        .and(query_param("maxResults", "1000"))
        .and(query_param("orderBy", "folder,modifiedDate,createdDate"))
        .and(FirstPage)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": DOC_ID}],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}/children", FOLDER_ID)))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": SHEET_ID}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Document linking to a presentation through a native link
    mount_metadata(&mock_server, DOC_ID, "Notes", "application/vnd.google-apps.document").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/documents/{}", DOC_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": {"content": [{"paragraph": {"elements": [{"textRun": {
                "content": "Slides",
                "textStyle": {"link": {
                    "url": format!("https://docs.google.com/presentation/d/{}/edit", SLIDES_ID)
                }}
            }}]}}]}
        })))
        .mount(&mock_server)
        .await;

    // Spreadsheet mentioning a private file in a cell
    mount_metadata(&mock_server, SHEET_ID, "Budget", "application/vnd.google-apps.spreadsheet")
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{}", SHEET_ID)))
        .and(query_param("includeGridData", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [{"data": [{"rowData": [{"values": [{"userEnteredValue": {
                "stringValue": format!(
                    "see https://drive.google.com/file/d/{}/view for details",
                    PRIVATE_ID
                )
            }}]}]}]}]
        })))
        .mount(&mock_server)
        .await;

    mount_metadata(&mock_server, SLIDES_ID, "Deck", "application/vnd.google-apps.presentation")
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/presentations/{}", SLIDES_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slides": []})))
        .mount(&mock_server)
        .await;

    // Not shared with us
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}", PRIVATE_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "File not found"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seeds = resolve_ids([format!("https://drive.google.com/drive/folders/{}", FOLDER_ID)]);
    assert_eq!(seeds, vec![FOLDER_ID.to_string()]);

    let report = crawl(&config, seeds, vec![], vec![], ShutdownSignal::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Drained);
    assert_eq!(report.fetched, 4);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.remaining, 0);

    let rows = read_rows(&results_path(output_dir.path(), &report.run));
    let mut recorded: Vec<_> = rows.iter().map(|row| row[0].clone()).collect();
    recorded.sort();
    let mut expected = vec![FOLDER_ID, DOC_ID, SHEET_ID, SLIDES_ID];
    expected.sort();
    assert_eq!(recorded, expected);

    let folder_row = rows
        .iter()
        .find(|row| row[0] == FOLDER_ID)
        .expect("Folder row missing");
    assert_eq!(
        folder_row,
        &vec![
            FOLDER_ID.to_string(),
            "Shared".to_string(),
            "application/vnd.google-apps.folder".to_string(),
            "2020-01-01T00:00:00.000Z".to_string(),
            "2020-06-01T00:00:00.000Z".to_string(),
            "3".to_string(),
            "https://drive.google.com/drive/folders/root_folder".to_string(),
            "me:writer".to_string(),
            "owner@example.com (Owner)".to_string(),
            "true".to_string(),
            "false".to_string(),
        ]
    );

    // Drained: everything visited, nothing left to queue
    let visited = load_ids(&visited_path(output_dir.path(), &report.run)).expect("Visited file");
    assert_eq!(visited.len(), 5);
    assert!(visited.contains(&PRIVATE_ID.to_string()));
    assert!(!frontier_path(output_dir.path(), &report.run).exists());
}

#[tokio::test]
async fn test_auth_expiry_halts_crawl() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    mount_metadata(&mock_server, DOC_ID, "Notes", "application/vnd.google-apps.document").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/documents/{}", DOC_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": {"content": [{"paragraph": {"elements": [{"textRun": {
                "content": format!(
                    "https://docs.google.com/spreadsheets/d/{} and {}",
                    SHEET_ID,
                    format!("https://drive.google.com/open?id={}", SLIDES_ID)
                )
            }}]}}]}
        })))
        .mount(&mock_server)
        .await;

    // Depth-first: the last link found is crawled next, and the token has expired by then
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}", SLIDES_ID)))
        .respond_with(ResponseTemplate::new(401).insert_header("www-authenticate", INVALID_TOKEN))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}", SHEET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata(
            SHEET_ID,
            "Budget",
            "application/vnd.google-apps.spreadsheet",
        )))
        .expect(0) // Should never be called after the token is rejected
        .mount(&mock_server)
        .await;

    let result = crawl(
        &config,
        vec![DOC_ID.to_string()],
        vec![],
        vec![],
        ShutdownSignal::new(),
    )
    .await;

    assert!(matches!(result, Err(ChaserError::AuthExpired)));

    // The run token is only known to the crawler; find the flushed files by prefix
    let names: Vec<String> = std::fs::read_dir(output_dir.path())
        .expect("Failed to list output dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    let visited_file = names
        .iter()
        .find(|name| name.starts_with("crawled-ids-"))
        .expect("Visited file missing");
    let queue_file = names
        .iter()
        .find(|name| name.starts_with("crawl_remaining_queue-"))
        .expect("Queue file missing");

    let visited = load_ids(&output_dir.path().join(visited_file)).expect("Visited file");
    assert_eq!(visited, vec![DOC_ID.to_string()]);

    let mut queue = load_ids(&output_dir.path().join(queue_file)).expect("Queue file");
    queue.sort();
    let mut expected = vec![SHEET_ID.to_string(), SLIDES_ID.to_string()];
    expected.sort();
    assert_eq!(queue, expected);
}

#[tokio::test]
async fn test_plain_file_recorded_without_body() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    mount_metadata(&mock_server, PDF_ID, "scan.pdf", "application/pdf").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/documents/{}", PDF_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0) // Should never be called for a non-Google file
        .mount(&mock_server)
        .await;

    let report = crawl(
        &config,
        vec![PDF_ID.to_string()],
        vec![],
        vec![],
        ShutdownSignal::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.fetched, 1);
    let rows = read_rows(&results_path(output_dir.path(), &report.run));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "scan.pdf");
    assert_eq!(rows[0][2], "application/pdf");
}

#[tokio::test]
async fn test_unreadable_body_still_recorded() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    mount_metadata(&mock_server, DOC_ID, "Notes", "application/vnd.google-apps.document").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/documents/{}", DOC_ID)))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&mock_server)
        .await;

    let report = crawl(
        &config,
        vec![DOC_ID.to_string()],
        vec![],
        vec![],
        ShutdownSignal::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Drained);
    assert_eq!(report.fetched, 1);
    assert_eq!(report.visited, 1);
}

#[tokio::test]
async fn test_interrupted_crawl_saves_queue() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0) // Nothing is fetched once shutdown is requested
        .mount(&mock_server)
        .await;

    let shutdown = ShutdownSignal::new();
    shutdown.trigger("test");

    let report = crawl(
        &config,
        vec![SHEET_ID.to_string()],
        vec![DOC_ID.to_string()],
        vec![FOLDER_ID.to_string()],
        shutdown,
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Interrupted);
    assert_eq!(
        load_ids(&frontier_path(output_dir.path(), &report.run)).expect("Queue file"),
        vec![DOC_ID.to_string(), SHEET_ID.to_string()]
    );
    assert_eq!(
        load_ids(&visited_path(output_dir.path(), &report.run)).expect("Visited file"),
        vec![FOLDER_ID.to_string()]
    );
}

#[tokio::test]
async fn test_auth_expiry_on_document_body() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    // Metadata succeeds, then the Docs API rejects the token without a header
    mount_metadata(&mock_server, DOC_ID, "Notes", "application/vnd.google-apps.document").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/documents/{}", DOC_ID)))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "status": "UNAUTHENTICATED"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = crawl(
        &config,
        vec![DOC_ID.to_string()],
        vec![],
        vec![],
        ShutdownSignal::new(),
    )
    .await;

    assert!(matches!(result, Err(ChaserError::AuthExpired)));

    // Nothing was recorded, and the document is queued for the next run
    let names: Vec<String> = std::fs::read_dir(output_dir.path())
        .expect("Failed to list output dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    assert!(!names.iter().any(|name| name.starts_with("crawled-ids-")));
    let queue_file = names
        .iter()
        .find(|name| name.starts_with("crawl_remaining_queue-"))
        .expect("Queue file missing");
    let queue = load_ids(&output_dir.path().join(queue_file)).expect("Queue file");
    assert_eq!(queue, vec![DOC_ID.to_string()]);
}

#[tokio::test]
async fn test_auth_expiry_on_folder_second_page() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    mount_metadata(&mock_server, FOLDER_ID, "Shared", "application/vnd.google-apps.folder").await;
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}/children", FOLDER_ID)))
        .and(FirstPage)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": DOC_ID}],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}/children", FOLDER_ID)))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(401).insert_header("www-authenticate", INVALID_TOKEN))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The child from the first page must not be crawled with a dead token
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}", DOC_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(metadata(
            DOC_ID,
            "Notes",
            "application/vnd.google-apps.document",
        )))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = crawl(
        &config,
        vec![FOLDER_ID.to_string()],
        vec![],
        vec![],
        ShutdownSignal::new(),
    )
    .await;

    assert!(matches!(result, Err(ChaserError::AuthExpired)));
}

#[tokio::test]
async fn test_overly_nested_body_yields_no_links() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), output_dir.path());

    // Deeper than serde_json's recursion limit, with a link at the bottom
    let depth = 200;
    let body = format!(
        "{}{{\"textRun\": {{\"content\": \"https://drive.google.com/open?id={}\"}}}}{}",
        "{\"nested\": ".repeat(depth),
        SHEET_ID,
        "}".repeat(depth)
    );

    mount_metadata(&mock_server, DOC_ID, "Notes", "application/vnd.google-apps.document").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/documents/{}", DOC_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/drive/v2/files/{}", SHEET_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0) // The link is never seen
        .mount(&mock_server)
        .await;

    let report = crawl(
        &config,
        vec![DOC_ID.to_string()],
        vec![],
        vec![],
        ShutdownSignal::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Drained);
    assert_eq!(report.fetched, 1);
    assert_eq!(report.visited, 1);
}

#[tokio::test]
async fn test_output_directory_is_created() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let nested = output_dir.path().join("runs").join("today");
    let config = create_test_config(&mock_server.uri(), &nested);

    let shutdown = ShutdownSignal::new();
    shutdown.trigger("test");

    let report = crawl(
        &config,
        vec![DOC_ID.to_string()],
        vec![],
        vec![],
        shutdown,
    )
    .await
    .expect("Crawl failed");

    assert!(results_path(&nested, &report.run).exists());
    assert_eq!(
        load_ids(&frontier_path(&nested, &report.run)).expect("Queue file"),
        vec![DOC_ID.to_string()]
    );
}

#[tokio::test]
async fn test_output_directory_blocked_by_file() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let blocker = output_dir.path().join("results");
    std::fs::write(&blocker, "not a directory").expect("Failed to write file");
    let config = create_test_config(&mock_server.uri(), &blocker);

    let result = crawl(
        &config,
        vec![DOC_ID.to_string()],
        vec![],
        vec![],
        ShutdownSignal::new(),
    )
    .await;

    assert!(matches!(result, Err(ChaserError::Io(_))));
}
