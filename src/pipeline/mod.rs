//! Network stages of a scan.
//!
//! ## Data Flow
//!
//! ```text
//! CaptureResult ──▶ upload ──▶ UploadedAsset ──▶ convert ──▶ ConvertedDocument
//!  (image bytes)   (multipart)   (image URL)     (JSON)       (PDF URL)
//! ```
//!
//! 1. [`upload`]   — multipart POST of the image; returns its durable URL
//! 2. [`convert`]  — JSON POST of that URL; returns the generated PDF's URL
//! 3. [`download`] — optional: fetch the PDF to a local file
//!
//! [`ScanApi`] is the seam between the orchestrator and the vendor. `convert`
//! takes an [`UploadedAsset`], and the only way to get one is a successful
//! `upload`, so the second stage cannot run after a failed first stage.
//! [`run_pipeline`] sequences the two stages and is the only place that does.

pub mod client;
pub mod convert;
pub mod download;
pub mod upload;

pub use client::PdfCoClient;

use crate::error::ScanError;
use crate::types::{CaptureResult, ConvertedDocument, UploadedAsset};
use async_trait::async_trait;
use tracing::{info, warn};

/// The two vendor endpoints the workflow consumes.
#[async_trait]
pub trait ScanApi: Send + Sync {
    /// Store the image remotely. `Ok` only when the status is 2xx and the
    /// payload's error flag is clear.
    async fn upload(&self, capture: &CaptureResult) -> Result<UploadedAsset, ScanError>;

    /// Turn an uploaded image into a PDF. Same success rule as `upload`.
    async fn convert(&self, asset: &UploadedAsset) -> Result<ConvertedDocument, ScanError>;
}

/// Progress through [`run_pipeline`], reported before each await point.
#[derive(Debug, Clone, Copy)]
pub enum StageEvent<'a> {
    /// About to send the upload request.
    Uploading,
    /// Upload succeeded.
    Uploaded(&'a UploadedAsset),
    /// About to send the convert request.
    Converting,
}

/// Validate the capture, then upload and convert it, strictly in order.
///
/// A capture whose media type is not `image/*` fails with
/// [`ScanError::InvalidInputType`] before any network call is made.
pub async fn run_pipeline<F>(
    api: &dyn ScanApi,
    capture: &CaptureResult,
    mut on_stage: F,
) -> Result<ConvertedDocument, ScanError>
where
    F: FnMut(StageEvent<'_>),
{
    if !capture.is_image() {
        warn!("Rejected capture with media type '{}'", capture.media_type);
        return Err(ScanError::InvalidInputType {
            media_type: capture.media_type.clone(),
        });
    }

    // ── Stage 1: Upload ──────────────────────────────────────────────────
    on_stage(StageEvent::Uploading);
    let asset = api.upload(capture).await?;
    info!("Uploaded '{}' → {}", capture.file_name, asset.url);
    on_stage(StageEvent::Uploaded(&asset));

    // ── Stage 2: Convert ─────────────────────────────────────────────────
    on_stage(StageEvent::Converting);
    let document = api.convert(&asset).await?;
    info!("Converted → {}", document.url);

    Ok(document)
}
