//! Capture affordances: where the document photo comes from.
//!
//! A [`CaptureSource`] is asked for one image and answers with zero or one
//! file. `Ok(None)` means the user backed out (closed the picker, quit the
//! camera app) and is not an error.
//!
//! Two sources ship with the crate:
//!
//! * [`FileCapture`] reads an image that already exists on disk.
//! * [`CommandCapture`] runs an external camera program that writes a photo
//!   into a temp directory we own, e.g. `libcamera-still -o {output}`.
//!
//! The declared media type comes from the file extension, the same way a
//! browser fills in `File.type`. It is never sniffed from the bytes: the
//! orchestrator validates what the source *declares*.

use crate::error::ScanError;
use crate::types::CaptureResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Which camera to prefer when the platform has more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Rear camera, pointed at the document.
    #[default]
    Environment,
    /// Front camera.
    User,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Environment => "environment",
            Facing::User => "user",
        }
    }
}

/// What the orchestrator asks the capture source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Accept filter, `image/*` for document scans.
    pub accept: String,
    pub facing: Facing,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            accept: "image/*".to_string(),
            facing: Facing::Environment,
        }
    }
}

/// The platform mechanism for acquiring a photo.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Acquire one image. `Ok(None)` when the user cancels.
    async fn capture(&self, request: &CaptureRequest) -> Result<Option<CaptureResult>, ScanError>;
}

/// Declared media type for a path, from its extension.
pub fn media_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string())
}

async fn read_capture(path: &Path, media_type: Option<&str>) -> Result<CaptureResult, ScanError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ScanError::CaptureFailed {
            reason: format!("cannot read '{}': {}", path.display(), e),
        })?;
    let media_type = media_type
        .map(str::to_string)
        .unwrap_or_else(|| media_type_for(path));
    debug!(
        "Captured '{}' ({}, {} bytes)",
        path.display(),
        media_type,
        bytes.len()
    );
    Ok(CaptureResult::new(file_name_of(path), media_type, bytes))
}

// ── FileCapture ──────────────────────────────────────────────────────────

/// Capture from an existing file on disk.
#[derive(Debug, Clone)]
pub struct FileCapture {
    path: PathBuf,
    media_type: Option<String>,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            media_type: None,
        }
    }

    /// Declare this media type instead of guessing from the extension.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

#[async_trait]
impl CaptureSource for FileCapture {
    async fn capture(&self, _request: &CaptureRequest) -> Result<Option<CaptureResult>, ScanError> {
        read_capture(&self.path, self.media_type.as_deref()).await.map(Some)
    }
}

// ── CommandCapture ───────────────────────────────────────────────────────

/// Capture by running an external camera program.
///
/// Arguments may contain `{output}` (path the program must write the photo
/// to) and `{facing}` (`environment` or `user`). If no argument mentions
/// `{output}`, the output path is appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    program: String,
    args: Vec<String>,
    file_name: String,
}

impl CommandCapture {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            file_name: "capture.jpg".to_string(),
        }
    }

    /// Parse a whitespace-separated command line such as
    /// `"libcamera-still -n -o {output}"`.
    pub fn from_command_line(line: &str) -> Result<Self, ScanError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            ScanError::InvalidConfig("camera command must not be empty".into())
        })?;
        Ok(Self::new(program, parts.collect()))
    }

    /// Name of the file the program writes. Its extension sets the media type.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    fn expand_args(&self, output: &Path, facing: Facing) -> Vec<String> {
        let output = output.to_string_lossy();
        let mut has_output = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                if a.contains("{output}") {
                    has_output = true;
                }
                a.replace("{output}", &output)
                    .replace("{facing}", facing.as_str())
            })
            .collect();
        if !has_output {
            args.push(output.into_owned());
        }
        args
    }
}

#[async_trait]
impl CaptureSource for CommandCapture {
    async fn capture(&self, request: &CaptureRequest) -> Result<Option<CaptureResult>, ScanError> {
        let temp_dir = TempDir::new().map_err(|e| ScanError::Internal(e.to_string()))?;
        let output = temp_dir.path().join(&self.file_name);
        let args = self.expand_args(&output, request.facing);

        info!("Running camera command: {} {}", self.program, args.join(" "));
        let status = tokio::process::Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|e| ScanError::CaptureFailed {
                reason: format!("cannot run '{}': {}", self.program, e),
            })?;

        if !status.success() {
            return Err(ScanError::CaptureFailed {
                reason: format!("'{}' exited with {}", self.program, status),
            });
        }

        if !output.exists() {
            info!("Camera command produced no photo; treating as cancelled");
            return Ok(None);
        }

        // `temp_dir` stays alive until the bytes are in memory.
        read_capture(&output, None).await.map(Some)
    }
}
