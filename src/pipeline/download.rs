//! Fetch the generated PDF to a local file.
//!
//! The vendor URL is temporary, so callers that want to keep the document
//! save it here. The write is atomic (temp file + rename): a failed download
//! never leaves a truncated PDF at the destination.

use crate::error::ScanError;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Download `url` to `output_path`, checking the `%PDF` magic bytes first.
///
/// Returns the number of bytes written.
pub async fn download_pdf(
    url: &str,
    output_path: impl AsRef<Path>,
    timeout_secs: u64,
) -> Result<u64, ScanError> {
    let path = output_path.as_ref();
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ScanError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            format!("timed out after {timeout_secs}s")
        } else {
            e.to_string()
        };
        ScanError::DownloadFailed {
            url: url.to_string(),
            reason,
        }
    })?;

    if !response.status().is_success() {
        return Err(ScanError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ScanError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !bytes.starts_with(b"%PDF") {
        return Err(ScanError::NotAPdf {
            url: url.to_string(),
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    write_atomic(path, &bytes).await?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}

/// Write to `<path>.tmp`, then rename over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ScanError> {
    let write_err = |source| ScanError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}
