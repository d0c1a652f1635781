//! The orchestrator's single source of truth for what phase a scan is in.

use crate::types::ConvertedDocument;
use serde::{Deserialize, Serialize};

/// Current phase of the scan workflow.
///
/// Exactly one phase is active at a time. `Succeeded` owns the
/// [`ConvertedDocument`], so a result URL exists if and only if the last scan
/// succeeded, and `Failed` owns the message shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Idle,
    Uploading,
    Converting,
    Succeeded(ConvertedDocument),
    Failed(String),
}

impl WorkflowState {
    /// True while a network stage is in flight. The scan trigger is inert then.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Uploading | WorkflowState::Converting)
    }

    /// True for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Succeeded(_) | WorkflowState::Failed(_))
    }

    /// The PDF link to display, if the last scan succeeded.
    pub fn result_url(&self) -> Option<&str> {
        match self {
            WorkflowState::Succeeded(doc) => Some(&doc.url),
            _ => None,
        }
    }

    /// The error message to display, if the last scan failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WorkflowState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Label for the scan trigger control.
    pub fn trigger_label(&self) -> &'static str {
        match self {
            WorkflowState::Uploading => "Uploading...",
            WorkflowState::Converting => "Converting...",
            _ => "Scan",
        }
    }

    /// Status line shown while a stage runs, if any.
    pub fn status_line(&self) -> Option<&'static str> {
        match self {
            WorkflowState::Uploading => Some("Uploading image..."),
            WorkflowState::Converting => Some("Converting to PDF..."),
            _ => None,
        }
    }
}
