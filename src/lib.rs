//! # scan2pdf
//!
//! Photograph a document, upload it to PDF.co, convert it to a PDF and get
//! back a link to the result.
//!
//! There is no local image processing: the crate sequences two calls to the
//! vendor's HTTP API and keeps track of where the user is in that sequence.
//!
//! ## Workflow
//!
//! ```text
//! trigger
//!  │
//!  ├─ 1. Capture  camera command or image file → CaptureResult
//!  ├─ 2. Check    declared media type must be image/*
//!  ├─ 3. Upload   multipart POST /file/upload → UploadedAsset (image URL)
//!  ├─ 4. Convert  JSON POST /pdf/convert/from/image → ConvertedDocument (PDF URL)
//!  └─ 5. Display  WorkflowState::Succeeded(doc) or WorkflowState::Failed(msg)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scan2pdf::{FileCapture, ScanConfig, ScanOrchestrator, WorkflowState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential from PDFCO_API_KEY
//!     let config = ScanConfig::from_env()?;
//!     let scanner = ScanOrchestrator::new(&config, Arc::new(FileCapture::new("receipt.jpg")))?;
//!
//!     match scanner.start_scan().await {
//!         WorkflowState::Succeeded(doc) => println!("{}", doc.url),
//!         WorkflowState::Failed(msg) => eprintln!("Error: {msg}"),
//!         _ => eprintln!("cancelled"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scan2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod capture;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod state;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use capture::{CaptureRequest, CaptureSource, CommandCapture, Facing, FileCapture};
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, Stage};
pub use orchestrator::ScanOrchestrator;
pub use pipeline::download::download_pdf;
pub use pipeline::{run_pipeline, PdfCoClient, ScanApi, StageEvent};
pub use progress::{NoopProgressCallback, ProgressCallback, ScanProgressCallback};
pub use state::WorkflowState;
pub use types::{CaptureResult, ConvertedDocument, UploadedAsset};
