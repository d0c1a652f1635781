//! Upload stage: send the captured image to the vendor's file store.
//!
//! The vendor answers with JSON even on some failures, but a non-2xx status
//! is reported from the status line alone; the body is not trusted then.

use crate::error::{status_text, ScanError};
use crate::types::{CaptureResult, UploadedAsset};
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

/// Endpoint path, relative to the API base URL.
pub const UPLOAD_PATH: &str = "/file/upload";

/// Multipart field name the vendor expects.
pub const FILE_FIELD: &str = "file";

/// POST the image as `multipart/form-data` and return the uploaded asset.
pub async fn upload_image(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    capture: &CaptureResult,
) -> Result<UploadedAsset, ScanError> {
    debug!(
        "Uploading '{}' ({}, {} bytes) to {}",
        capture.file_name,
        capture.media_type,
        capture.bytes.len(),
        url
    );

    let part = Part::bytes(capture.bytes.clone())
        .file_name(capture.file_name.clone())
        .mime_str(&capture.media_type)
        .map_err(|e| ScanError::UploadFailed {
            status_text: format!("invalid media type '{}': {}", capture.media_type, e),
        })?;
    let form = Form::new().part(FILE_FIELD, part);

    let response = http
        .post(url)
        .header(super::client::API_KEY_HEADER, api_key)
        .multipart(form)
        .send()
        .await
        .map_err(|e| ScanError::UploadFailed {
            status_text: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!("Upload returned HTTP {}", status);
        return Err(ScanError::UploadFailed {
            status_text: status_text(status),
        });
    }

    let asset: UploadedAsset = response.json().await.map_err(|e| ScanError::UploadFailed {
        status_text: format!("unreadable response: {e}"),
    })?;

    check_asset(asset)
}

/// Apply the payload-level success rule to a 2xx response body.
pub(crate) fn check_asset(asset: UploadedAsset) -> Result<UploadedAsset, ScanError> {
    if asset.error || asset.url.is_empty() {
        warn!(
            "Upload rejected by vendor (error={}, status={})",
            asset.error, asset.status
        );
        return Err(ScanError::UploadRejected);
    }
    Ok(asset)
}
