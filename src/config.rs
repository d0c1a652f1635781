//! Configuration for the scan workflow.
//!
//! Everything the orchestrator needs from the outside world that is not a
//! collaborator lives in [`ScanConfig`]: the vendor credential, where the
//! vendor lives, and timeouts. It is passed in at construction, so there is
//! no process-wide API key and tests can point the client at a local server.

use crate::error::ScanError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Production base URL of the PDF.co v1 API.
pub const DEFAULT_BASE_URL: &str = "https://api.pdf.co/v1";

/// Environment variable holding the static credential.
pub const API_KEY_ENV: &str = "PDFCO_API_KEY";

/// Configuration for a [`crate::ScanOrchestrator`] and its vendor client.
///
/// # Example
/// ```rust
/// use scan2pdf::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .api_key("demo-key")
///     .request_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "https://api.pdf.co/v1");
/// ```
#[derive(Clone)]
pub struct ScanConfig {
    /// Static credential sent as the `x-api-key` header on every call.
    pub api_key: String,

    /// Vendor API root, without trailing slash. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Per-request timeout for upload and convert. Default: None.
    ///
    /// None leaves timeouts to the network stack. The convert call is
    /// synchronous on the vendor side and can legitimately take a while.
    pub request_timeout_secs: Option<u64>,

    /// Timeout for fetching the generated PDF to disk. Default: 120.
    pub download_timeout_secs: u64,

    /// Receives state transitions as the scan progresses.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ScanProgressCallback>"),
            )
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a config whose credential comes from `PDFCO_API_KEY`.
    pub fn from_env() -> Result<Self, ScanError> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| {
            ScanError::InvalidConfig(format!("{API_KEY_ENV} is not set"))
        })?;
        Self::builder().api_key(key).build()
    }

    /// Full URL of an endpoint path such as `/file/upload`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, ScanError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(ScanError::InvalidConfig(format!(
                "API key must not be empty (set {API_KEY_ENV} or pass --api-key)"
            )));
        }
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(ScanError::InvalidConfig(format!(
                "Base URL must be HTTP/HTTPS, got '{}'",
                c.base_url
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ScanError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
