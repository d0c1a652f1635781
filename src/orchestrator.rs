//! The scan workflow: capture → upload → convert → display.
//!
//! [`ScanOrchestrator`] owns the one [`WorkflowState`] and is the only thing
//! that mutates it. Its three operations mirror what a scanner UI offers:
//! a scan trigger ([`ScanOrchestrator::start_scan`]), the capture callback
//! ([`ScanOrchestrator::on_capture_received`]) and a reset.
//!
//! At most one workflow is in flight. The orchestrator is `Send + Sync` and
//! every operation takes `&self`, so a UI task can hold it in an `Arc` and
//! press the trigger at any time; while a scan is uploading or converting
//! those presses are no-ops that return the current state.

use crate::capture::{CaptureRequest, CaptureSource};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::pipeline::{run_pipeline, PdfCoClient, ScanApi, StageEvent};
use crate::progress::ProgressCallback;
use crate::state::WorkflowState;
use crate::types::CaptureResult;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Sequences one scan at a time and publishes its state.
pub struct ScanOrchestrator {
    api: Arc<dyn ScanApi>,
    capture: Arc<dyn CaptureSource>,
    progress: Option<ProgressCallback>,
    request: CaptureRequest,
    state: Mutex<WorkflowState>,
    /// Held for the whole capture → convert chain.
    in_flight: tokio::sync::Mutex<()>,
}

impl ScanOrchestrator {
    /// Build an orchestrator talking to PDF.co with the config's credential.
    pub fn new(config: &ScanConfig, capture: Arc<dyn CaptureSource>) -> Result<Self, ScanError> {
        let api = Arc::new(PdfCoClient::new(config)?);
        Ok(Self::with_api(config, api, capture))
    }

    /// Build an orchestrator around any [`ScanApi`] implementation.
    pub fn with_api(
        config: &ScanConfig,
        api: Arc<dyn ScanApi>,
        capture: Arc<dyn CaptureSource>,
    ) -> Self {
        Self {
            api,
            capture,
            progress: config.progress_callback.clone(),
            request: CaptureRequest::default(),
            state: Mutex::new(WorkflowState::Idle),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WorkflowState {
        self.lock_state().clone()
    }

    /// True while a scan is in flight; the trigger should be disabled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Reset, invoke the capture source, and run the captured file through
    /// upload and convert.
    ///
    /// Returns the state reached. A cancelled capture leaves the state `Idle`.
    /// Inert while another scan is in flight.
    pub async fn start_scan(&self) -> WorkflowState {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("start_scan ignored: a scan is already in flight");
            return self.state();
        };

        if let Some(ref cb) = self.progress {
            cb.on_scan_start();
        }
        self.set_state(WorkflowState::Idle);

        match self.capture.capture(&self.request).await {
            Ok(Some(file)) => self.process_capture(file).await,
            Ok(None) => {
                info!("Capture cancelled; staying idle");
                self.state()
            }
            Err(e) => self.fail(e),
        }
    }

    /// Feed a captured file straight into the workflow, without invoking the
    /// capture source. Inert while another scan is in flight.
    pub async fn on_capture_received(&self, file: CaptureResult) -> WorkflowState {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("on_capture_received ignored: a scan is already in flight");
            return self.state();
        };
        self.process_capture(file).await
    }

    /// Return to `Idle`, dropping any result or error. Inert while a scan is
    /// in flight, since an in-flight scan cannot be cancelled.
    pub fn reset(&self) -> WorkflowState {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("reset ignored: a scan is already in flight");
            return self.state();
        };
        self.set_state(WorkflowState::Idle);
        WorkflowState::Idle
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    /// Caller must hold `in_flight`.
    async fn process_capture(&self, file: CaptureResult) -> WorkflowState {
        info!(
            "Received capture '{}' ({}, {} bytes)",
            file.file_name,
            file.media_type,
            file.bytes.len()
        );

        let result = run_pipeline(self.api.as_ref(), &file, |event| match event {
            StageEvent::Uploading => self.set_state(WorkflowState::Uploading),
            StageEvent::Uploaded(asset) => {
                if let Some(ref cb) = self.progress {
                    cb.on_upload_complete(asset);
                }
            }
            StageEvent::Converting => self.set_state(WorkflowState::Converting),
        })
        .await;

        match result {
            Ok(document) => {
                let state = WorkflowState::Succeeded(document);
                self.set_state(state.clone());
                self.complete(&state);
                state
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, error: ScanError) -> WorkflowState {
        warn!(stage = ?error.stage(), "Scan failed: {}", error);
        let state = WorkflowState::Failed(error.to_string());
        self.set_state(state.clone());
        self.complete(&state);
        state
    }

    fn complete(&self, state: &WorkflowState) {
        if let Some(ref cb) = self.progress {
            cb.on_scan_complete(state);
        }
    }

    fn set_state(&self, next: WorkflowState) {
        {
            let mut state = self.lock_state();
            if *state == next {
                return;
            }
            debug!("State: {} → {}", state.trigger_label(), next.trigger_label());
            *state = next.clone();
        }
        if let Some(ref cb) = self.progress {
            cb.on_state_change(&next);
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
