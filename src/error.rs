//! Error types for the scan2pdf library.
//!
//! A single error type, [`ScanError`], covers every way a scan can end badly.
//! The workflow variants (`InvalidInputType`, `Upload*`, `Convert*`,
//! `CaptureFailed`) are terminal for the current scan: their `Display` text
//! is exactly what the user is shown in [`crate::state::WorkflowState::Failed`].
//! The remaining variants come from configuration and from the optional
//! PDF download step, which runs after a scan has already succeeded.
//!
//! Nothing here is retried. Every failure needs the user to start a new scan.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the scan2pdf library.
#[derive(Debug, Error)]
pub enum ScanError {
    // ── Capture errors ────────────────────────────────────────────────────
    /// The captured file does not declare an `image/*` media type.
    #[error("Please select an image file")]
    InvalidInputType { media_type: String },

    /// The capture affordance itself failed (missing file, camera error).
    #[error("Capture failed: {reason}")]
    CaptureFailed { reason: String },

    // ── Upload errors ─────────────────────────────────────────────────────
    /// Upload returned a non-2xx status or never produced a readable response.
    #[error("Upload failed: {status_text}")]
    UploadFailed { status_text: String },

    /// Upload returned 2xx but the payload has `error: true` (or no URL).
    #[error("Upload failed")]
    UploadRejected,

    // ── Convert errors ────────────────────────────────────────────────────
    /// Conversion returned a non-2xx status or never produced a readable response.
    #[error("Conversion failed: {status_text}")]
    ConvertFailed { status_text: String },

    /// Conversion returned 2xx but the payload has `error: true` (or no URL).
    #[error("PDF conversion failed")]
    ConvertRejected,

    // ── Download errors ───────────────────────────────────────────────────
    /// Fetching the generated PDF failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// The downloaded body does not start with `%PDF`.
    #[error("Downloaded file is not a valid PDF: '{url}'\nFirst bytes: {magic:?}")]
    NotAPdf { url: String, magic: Vec<u8> },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    /// Which workflow stage produced this error, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ScanError::InvalidInputType { .. } | ScanError::CaptureFailed { .. } => {
                Some(Stage::Capture)
            }
            ScanError::UploadFailed { .. } | ScanError::UploadRejected => Some(Stage::Upload),
            ScanError::ConvertFailed { .. } | ScanError::ConvertRejected => Some(Stage::Convert),
            _ => None,
        }
    }
}

/// The three stages of a scan that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Capture,
    Upload,
    Convert,
}

/// Human-readable text for an HTTP status, e.g. `Internal Server Error`.
///
/// Falls back to the numeric code for statuses without a canonical reason.
pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
