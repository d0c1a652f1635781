//! Progress-callback trait for scan workflow events.
//!
//! Inject an [`Arc<dyn ScanProgressCallback>`] via
//! [`crate::config::ScanConfigBuilder::progress_callback`] to drive a display
//! layer: a terminal spinner, a GUI button label, a log line per stage.
//!
//! # Example
//!
//! ```rust
//! use scan2pdf::{ScanConfig, ScanProgressCallback, WorkflowState};
//! use std::sync::Arc;
//!
//! struct PrintStates;
//!
//! impl ScanProgressCallback for PrintStates {
//!     fn on_state_change(&self, state: &WorkflowState) {
//!         eprintln!("now: {}", state.trigger_label());
//!     }
//! }
//!
//! let config = ScanConfig::builder()
//!     .api_key("demo-key")
//!     .progress_callback(Arc::new(PrintStates) as Arc<dyn ScanProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::state::WorkflowState;
use crate::types::UploadedAsset;
use std::sync::Arc;

/// Called by the orchestrator as a scan moves through its states.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Calls arrive in order from the task running the scan.
pub trait ScanProgressCallback: Send + Sync {
    /// Called once when a scan is triggered, before capture.
    fn on_scan_start(&self) {}

    /// Called on every state transition, including the reset to `Idle`.
    fn on_state_change(&self, state: &WorkflowState) {
        let _ = state;
    }

    /// Called when the upload stage has produced a remote URL.
    fn on_upload_complete(&self, asset: &UploadedAsset) {
        let _ = asset;
    }

    /// Called once the scan reaches `Succeeded` or `Failed`.
    fn on_scan_complete(&self, state: &WorkflowState) {
        let _ = state;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ScanProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ScanConfig`].
pub type ProgressCallback = Arc<dyn ScanProgressCallback>;
