//! CLI binary for scan2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to `ScanConfig`,
//! picks a capture source, runs one scan and prints the PDF link.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scan2pdf::{
    download_pdf, CaptureSource, CommandCapture, FileCapture, ScanConfig, ScanOrchestrator,
    ScanProgressCallback, UploadedAsset, WorkflowState,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal display layer: one spinner whose message follows the workflow
/// state ("Uploading image...", "Converting to PDF...").
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Scan");
        Arc::new(Self { bar })
    }
}

impl ScanProgressCallback for CliProgressCallback {
    fn on_scan_start(&self) {
        self.bar.set_message("Waiting for capture…");
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_state_change(&self, state: &WorkflowState) {
        if let Some(line) = state.status_line() {
            self.bar.set_prefix(state.trigger_label());
            self.bar.set_message(line);
        }
    }

    fn on_upload_complete(&self, asset: &UploadedAsset) {
        self.bar.println(format!(
            "  {} Uploaded {}  {}",
            green("✓"),
            asset.name,
            dim(&format!("{} credits left", asset.remaining_credits)),
        ));
    }

    fn on_scan_complete(&self, _state: &WorkflowState) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert an existing photo
  scan2pdf receipt.jpg

  # Take the photo with the rear camera (Raspberry Pi)
  scan2pdf --camera-command "libcamera-still -n -o {output}"

  # Take the photo with a USB webcam and keep the PDF locally
  scan2pdf --camera-command "fswebcam -r 1920x1080 --no-banner {output}" -o scan.pdf

  # Open the result in the default PDF viewer
  scan2pdf receipt.jpg --open

  # Machine-readable result
  scan2pdf receipt.jpg --json

CAMERA COMMAND PLACEHOLDERS:
  {output}   path the program must write the photo to (appended if absent)
  {facing}   preferred camera: "environment" (rear)

ENVIRONMENT VARIABLES:
  PDFCO_API_KEY       PDF.co API key (required)
  PDFCO_BASE_URL      Override the API root (default https://api.pdf.co/v1)
  RUST_LOG            Override log filtering (e.g. scan2pdf=debug)
"#;

/// Photograph a document and convert it to PDF with PDF.co.
#[derive(Parser, Debug)]
#[command(
    name = "scan2pdf",
    version,
    about = "Photograph a document and convert it to PDF with PDF.co",
    long_about = "Capture a document photo (from an image file or a camera command), upload it \
to PDF.co, convert it to a PDF and print the resulting link.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image file to convert.
    #[arg(required_unless_present = "camera_command", conflicts_with = "camera_command")]
    image: Option<PathBuf>,

    /// External camera program that writes one photo to {output}.
    #[arg(long, env = "SCAN2PDF_CAMERA_COMMAND")]
    camera_command: Option<String>,

    /// Declared media type of IMAGE, instead of guessing from its extension.
    #[arg(long)]
    media_type: Option<String>,

    /// PDF.co API key.
    #[arg(long, env = "PDFCO_API_KEY", hide_env_values = true)]
    api_key: String,

    /// API root URL.
    #[arg(long, env = "PDFCO_BASE_URL", default_value = scan2pdf::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout for upload and convert, in seconds. Default: none.
    #[arg(long, env = "SCAN2PDF_TIMEOUT")]
    timeout: Option<u64>,

    /// Also download the generated PDF to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PDF download timeout in seconds.
    #[arg(long, default_value_t = 120)]
    download_timeout: u64,

    /// Open the generated PDF with the system's default handler.
    #[arg(long)]
    open: bool,

    /// Print the final state as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "SCAN2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already says which stage is running, so library INFO logs
    // are suppressed while it is visible.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ScanConfig::builder()
        .api_key(cli.api_key.clone())
        .base_url(cli.base_url.clone())
        .download_timeout_secs(cli.download_timeout);
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new());
    }
    let config = builder.build().context("Invalid configuration")?;

    let capture = capture_source(&cli)?;
    let scanner = ScanOrchestrator::new(&config, capture).context("Failed to set up scanner")?;

    // ── Run one scan ─────────────────────────────────────────────────────
    let state = scanner.start_scan().await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&state).context("Failed to serialise result")?
        );
    }

    match state {
        WorkflowState::Succeeded(doc) => {
            if !cli.json {
                if !cli.quiet {
                    eprintln!("{} {}", green("✔"), bold("PDF Converted Successfully!"));
                }
                println!("{}", doc.url);
            }

            if let Some(ref path) = cli.output {
                let bytes = download_pdf(&doc.url, path, config.download_timeout_secs)
                    .await
                    .context("Failed to download the generated PDF")?;
                if !cli.quiet {
                    eprintln!(
                        "   {} bytes  →  {}",
                        dim(&bytes.to_string()),
                        bold(&path.display().to_string())
                    );
                }
            }

            if cli.open {
                open::that(&doc.url)
                    .with_context(|| format!("Failed to open {}", doc.url))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        WorkflowState::Failed(msg) => {
            if !cli.json {
                eprintln!("{} {}", red("Error:"), msg);
            }
            Ok(ExitCode::FAILURE)
        }
        _ => {
            if !cli.quiet && !cli.json {
                eprintln!("{}", dim("No photo captured; nothing to do."));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Pick the capture source from IMAGE or --camera-command.
fn capture_source(cli: &Cli) -> Result<Arc<dyn CaptureSource>> {
    if let Some(ref line) = cli.camera_command {
        let cmd = CommandCapture::from_command_line(line).context("Invalid --camera-command")?;
        return Ok(Arc::new(cmd));
    }

    let path = cli
        .image
        .clone()
        .context("Provide an IMAGE path or --camera-command")?;
    let mut file = FileCapture::new(path);
    if let Some(ref media_type) = cli.media_type {
        file = file.with_media_type(media_type.clone());
    }
    Ok(Arc::new(file))
}
