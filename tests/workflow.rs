//! Workflow tests against a local mock of the PDF.co API.
//!
//! Each test starts an axum server on an ephemeral port that speaks the
//! upload/convert contract, then drives the real `PdfCoClient` through a
//! `ScanOrchestrator`. The mock records what it received so tests can check
//! headers, multipart fields and the convert body.

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use scan2pdf::{
    download_pdf, FileCapture, ScanConfig, ScanError, ScanOrchestrator, WorkflowState,
};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const API_KEY: &str = "test-key";

// ── Mock vendor ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Reply {
    Ok,
    Status(u16),
    ErrorFlag,
}

#[derive(Default)]
struct Seen {
    api_keys: Vec<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
    convert_body: Option<Value>,
}

struct Vendor {
    upload_reply: Reply,
    convert_reply: Reply,
    upload_calls: AtomicUsize,
    convert_calls: AtomicUsize,
    seen: Mutex<Seen>,
}

impl Vendor {
    fn new(upload_reply: Reply, convert_reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            upload_reply,
            convert_reply,
            upload_calls: AtomicUsize::new(0),
            convert_calls: AtomicUsize::new(0),
            seen: Mutex::new(Seen::default()),
        })
    }

    fn calls(&self) -> (usize, usize) {
        (
            self.upload_calls.load(Ordering::SeqCst),
            self.convert_calls.load(Ordering::SeqCst),
        )
    }

    /// Record the key; answer 401 if it is not the expected one.
    fn check_key(&self, headers: &HeaderMap) -> Option<Response> {
        let key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let ok = key == API_KEY;
        self.seen.lock().unwrap().api_keys.push(key);
        (!ok).then(|| StatusCode::UNAUTHORIZED.into_response())
    }
}

fn reply(reply: Reply, ok_body: Value) -> Response {
    match reply {
        Reply::Ok => Json(ok_body).into_response(),
        Reply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "error": true, "status": code, "message": "mock failure" })),
        )
            .into_response(),
        Reply::ErrorFlag => Json(json!({
            "error": true,
            "status": 400,
            "message": "mock rejection"
        }))
        .into_response(),
    }
}

async fn upload(
    State(vendor): State<Arc<Vendor>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    vendor.upload_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(denied) = vendor.check_key(&headers) {
        return denied;
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();

        let mut seen = vendor.seen.lock().unwrap();
        seen.file_name = file_name;
        seen.content_type = content_type;
        seen.bytes = bytes.to_vec();
    }

    reply(
        vendor.upload_reply,
        json!({
            "url": "https://x/img.jpg",
            "error": false,
            "status": 200,
            "name": "img.jpg",
            "remainingCredits": 9999
        }),
    )
}

async fn convert(
    State(vendor): State<Arc<Vendor>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    vendor.convert_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(denied) = vendor.check_key(&headers) {
        return denied;
    }
    vendor.seen.lock().unwrap().convert_body = Some(body);

    reply(
        vendor.convert_reply,
        json!({
            "url": "https://x/out.pdf",
            "error": false,
            "status": 200,
            "pageCount": 1,
            "name": "img.pdf"
        }),
    )
}

/// Start the mock and return its root URL (`http://127.0.0.1:PORT`).
async fn spawn_vendor(vendor: Arc<Vendor>) -> String {
    let app = Router::new()
        .route("/v1/file/upload", post(upload))
        .route("/v1/pdf/convert/from/image", post(convert))
        .route("/files/out.pdf", get(|| async { "%PDF-1.7\n%mock\n" }))
        .route("/files/page.html", get(|| async { "<html>nope</html>" }))
        .with_state(vendor);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ── Test helpers ─────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn photo(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    f.write_all(contents).unwrap();
    f
}

async fn scanner_for(root: &str, key: &str, file: &tempfile::NamedTempFile) -> ScanOrchestrator {
    let config = ScanConfig::builder()
        .api_key(key)
        .base_url(format!("{root}/v1"))
        .request_timeout_secs(10)
        .build()
        .expect("valid config");
    ScanOrchestrator::new(&config, Arc::new(FileCapture::new(file.path()))).expect("client")
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn jpeg_scan_succeeds_and_shows_convert_url() {
    init_tracing();
    let vendor = Vendor::new(Reply::Ok, Reply::Ok);
    let root = spawn_vendor(vendor.clone()).await;
    let file = photo(".jpg", b"\xFF\xD8\xFF\xE0mock-jpeg");

    let scanner = scanner_for(&root, API_KEY, &file).await;
    let state = scanner.start_scan().await;

    assert_eq!(state.result_url(), Some("https://x/out.pdf"), "state: {state:?}");
    assert!(matches!(scanner.state(), WorkflowState::Succeeded(_)));
    assert_eq!(vendor.calls(), (1, 1));

    let seen = vendor.seen.lock().unwrap();
    assert_eq!(seen.api_keys, vec![API_KEY, API_KEY]);
    assert_eq!(seen.content_type.as_deref(), Some("image/jpeg"));
    assert!(seen.file_name.as_deref().unwrap_or("").ends_with(".jpg"));
    assert_eq!(seen.bytes, b"\xFF\xD8\xFF\xE0mock-jpeg");
    assert_eq!(
        seen.convert_body,
        Some(json!({ "url": "https://x/img.jpg", "async": false }))
    );
}

#[tokio::test]
async fn text_file_fails_without_any_request() {
    let vendor = Vendor::new(Reply::Ok, Reply::Ok);
    let root = spawn_vendor(vendor.clone()).await;
    let file = photo(".txt", b"just some notes");

    let scanner = scanner_for(&root, API_KEY, &file).await;
    let state = scanner.start_scan().await;

    assert_eq!(state, WorkflowState::Failed("Please select an image file".into()));
    assert_eq!(vendor.calls(), (0, 0));
}

#[tokio::test]
async fn upload_http_500_never_converts() {
    let vendor = Vendor::new(Reply::Status(500), Reply::Ok);
    let root = spawn_vendor(vendor.clone()).await;
    let file = photo(".jpg", b"\xFF\xD8\xFF");

    let state = scanner_for(&root, API_KEY, &file).await.start_scan().await;

    assert_eq!(state.error_message(), Some("Upload failed: Internal Server Error"));
    assert_eq!(vendor.calls(), (1, 0));
}

#[tokio::test]
async fn upload_error_flag_never_converts() {
    let vendor = Vendor::new(Reply::ErrorFlag, Reply::Ok);
    let root = spawn_vendor(vendor.clone()).await;
    let file = photo(".png", b"\x89PNG");

    let state = scanner_for(&root, API_KEY, &file).await.start_scan().await;

    assert_eq!(state.error_message(), Some("Upload failed"));
    assert_eq!(vendor.calls(), (1, 0));
}

#[tokio::test]
async fn wrong_api_key_is_upload_failure() {
    let vendor = Vendor::new(Reply::Ok, Reply::Ok);
    let root = spawn_vendor(vendor.clone()).await;
    let file = photo(".jpg", b"\xFF\xD8\xFF");

    let state = scanner_for(&root, "not-the-key", &file).await.start_scan().await;

    assert_eq!(state.error_message(), Some("Upload failed: Unauthorized"));
    assert_eq!(vendor.calls(), (1, 0));
}

#[tokio::test]
async fn convert_error_flag_shows_no_link() {
    let vendor = Vendor::new(Reply::Ok, Reply::ErrorFlag);
    let root = spawn_vendor(vendor.clone()).await;
    let file = photo(".jpg", b"\xFF\xD8\xFF");

    let state = scanner_for(&root, API_KEY, &file).await.start_scan().await;

    assert_eq!(state.error_message(), Some("PDF conversion failed"));
    assert_eq!(state.result_url(), None);
    assert_eq!(vendor.calls(), (1, 1));
}

#[tokio::test]
async fn convert_http_error_shows_status_text() {
    let vendor = Vendor::new(Reply::Ok, Reply::Status(502));
    let root = spawn_vendor(vendor.clone()).await;
    let file = photo(".jpg", b"\xFF\xD8\xFF");

    let state = scanner_for(&root, API_KEY, &file).await.start_scan().await;

    assert_eq!(state.error_message(), Some("Conversion failed: Bad Gateway"));
    assert_eq!(state.result_url(), None);
}

#[tokio::test]
async fn unreachable_vendor_is_upload_failure() {
    let file = photo(".jpg", b"\xFF\xD8\xFF");
    // Nothing listens on the discard port.
    let state = scanner_for("http://127.0.0.1:9", API_KEY, &file)
        .await
        .start_scan()
        .await;

    let msg = state.error_message().expect("failed state");
    assert!(msg.starts_with("Upload failed: "), "got: {msg}");
}

// ── PDF download ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn download_writes_pdf() {
    let root = spawn_vendor(Vendor::new(Reply::Ok, Reply::Ok)).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("scans/out.pdf");

    let written = download_pdf(&format!("{root}/files/out.pdf"), &out, 10)
        .await
        .expect("download should succeed");

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(written, bytes.len() as u64);
}

#[tokio::test]
async fn download_rejects_non_pdf() {
    let root = spawn_vendor(Vendor::new(Reply::Ok, Reply::Ok)).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pdf");

    let err = download_pdf(&format!("{root}/files/page.html"), &out, 10)
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::NotAPdf { .. }), "got: {err:?}");
    assert!(!out.exists(), "nothing written for a rejected body");
}

#[tokio::test]
async fn download_missing_file_is_failure() {
    let root = spawn_vendor(Vendor::new(Reply::Ok, Reply::Ok)).await;
    let dir = tempfile::tempdir().unwrap();

    let err = download_pdf(&format!("{root}/files/gone.pdf"), dir.path().join("x.pdf"), 10)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("HTTP 404"), "got: {err}");
}
