//! Convert stage: ask the vendor to turn an uploaded image into a PDF.
//!
//! The request is synchronous (`"async": false`): the HTTP call returns only
//! once the PDF exists, so there is no job to poll.

use crate::error::{status_text, ScanError};
use crate::types::{ConvertRequest, ConvertedDocument, UploadedAsset};
use tracing::{debug, warn};

/// Endpoint path, relative to the API base URL.
pub const CONVERT_PATH: &str = "/pdf/convert/from/image";

/// POST `{ "url": <asset url>, "async": false }` and return the generated PDF.
pub async fn convert_image(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    asset: &UploadedAsset,
) -> Result<ConvertedDocument, ScanError> {
    debug!("Requesting PDF conversion of {} via {}", asset.url, url);

    let body = ConvertRequest {
        url: &asset.url,
        is_async: false,
    };

    let response = http
        .post(url)
        .header(super::client::API_KEY_HEADER, api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| ScanError::ConvertFailed {
            status_text: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!("Conversion returned HTTP {}", status);
        return Err(ScanError::ConvertFailed {
            status_text: status_text(status),
        });
    }

    let document: ConvertedDocument =
        response.json().await.map_err(|e| ScanError::ConvertFailed {
            status_text: format!("unreadable response: {e}"),
        })?;

    check_document(document)
}

/// Apply the payload-level success rule to a 2xx response body.
pub(crate) fn check_document(document: ConvertedDocument) -> Result<ConvertedDocument, ScanError> {
    if document.error || document.url.is_empty() {
        warn!(
            "Conversion rejected by vendor (error={}, status={})",
            document.error, document.status
        );
        return Err(ScanError::ConvertRejected);
    }
    Ok(document)
}
