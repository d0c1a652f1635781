//! End-to-end tests against the real PDF.co API.
//!
//! These spend API credits, so they are gated behind `E2E_ENABLED` and need a
//! real key in `PDFCO_API_KEY`. They do not run in CI unless explicitly
//! requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFCO_API_KEY=... cargo test --test e2e -- --nocapture

use scan2pdf::{
    download_pdf, CaptureResult, FileCapture, ScanConfig, ScanOrchestrator, WorkflowState,
};
use std::sync::Arc;

/// A 1×1 white JPEG, small enough to embed and valid for any image decoder.
const TINY_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x01, 0x00,
    0x48, 0x00, 0x48, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x03, 0x02, 0x02, 0x02, 0x02,
    0x02, 0x03, 0x02, 0x02, 0x02, 0x03, 0x03, 0x03, 0x03, 0x04, 0x06, 0x04, 0x04, 0x04, 0x04,
    0x04, 0x08, 0x06, 0x06, 0x05, 0x06, 0x09, 0x08, 0x0A, 0x0A, 0x09, 0x08, 0x09, 0x09, 0x0A,
    0x0C, 0x0F, 0x0C, 0x0A, 0x0B, 0x0E, 0x0B, 0x09, 0x09, 0x0D, 0x11, 0x0D, 0x0E, 0x0F, 0x10,
    0x10, 0x11, 0x10, 0x0A, 0x0C, 0x12, 0x13, 0x12, 0x10, 0x13, 0x0F, 0x10, 0x10, 0x10, 0xFF,
    0xC9, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xCC, 0x00,
    0x06, 0x00, 0x10, 0x10, 0x05, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00,
    0xD2, 0xCF, 0x20, 0xFF, 0xD9,
];

/// Skip this test unless E2E_ENABLED and PDFCO_API_KEY are both set.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        match ScanConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                println!("SKIP — {e}");
                return;
            }
        }
    }};
}

#[tokio::test]
async fn test_live_scan_of_tiny_jpeg() {
    let config = e2e_skip_unless_ready!();

    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("tiny.jpg");
    std::fs::write(&image, TINY_JPEG).unwrap();

    let scanner = ScanOrchestrator::new(&config, Arc::new(FileCapture::new(&image)))
        .expect("client should build");
    let state = scanner.start_scan().await;

    let url = match &state {
        WorkflowState::Succeeded(doc) => doc.url.clone(),
        other => panic!("expected success, got {other:?}"),
    };
    assert!(url.starts_with("https://"), "unexpected URL: {url}");
    println!("PDF: {url}");

    let out = dir.path().join("tiny.pdf");
    let bytes = download_pdf(&url, &out, config.download_timeout_secs)
        .await
        .expect("generated PDF should download");
    assert!(bytes > 0);
}

#[tokio::test]
async fn test_live_bad_key_fails_upload() {
    let _ = e2e_skip_unless_ready!();

    let config = ScanConfig::builder()
        .api_key("definitely-not-a-valid-key")
        .build()
        .unwrap();
    let scanner = ScanOrchestrator::new(&config, Arc::new(FileCapture::new("unused.jpg")))
        .expect("client should build");

    let state = scanner
        .on_capture_received(CaptureResult::new("tiny.jpg", "image/jpeg", TINY_JPEG))
        .await;

    let msg = state.error_message().expect("scan must fail with a bad key");
    assert!(msg.starts_with("Upload failed"), "got: {msg}");
}
