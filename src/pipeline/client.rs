//! [`ScanApi`] implementation backed by the PDF.co HTTP API.

use super::convert::{convert_image, CONVERT_PATH};
use super::upload::{upload_image, UPLOAD_PATH};
use super::ScanApi;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::types::{CaptureResult, ConvertedDocument, UploadedAsset};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Header carrying the static credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the upload and convert endpoints.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Clone)]
pub struct PdfCoClient {
    http: reqwest::Client,
    api_key: String,
    upload_url: String,
    convert_url: String,
}

impl fmt::Debug for PdfCoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfCoClient")
            .field("upload_url", &self.upload_url)
            .field("convert_url", &self.convert_url)
            .finish_non_exhaustive()
    }
}

impl PdfCoClient {
    /// Build a client from the config's credential, base URL and timeout.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ScanError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            upload_url: config.endpoint(UPLOAD_PATH),
            convert_url: config.endpoint(CONVERT_PATH),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    pub fn convert_url(&self) -> &str {
        &self.convert_url
    }
}

#[async_trait]
impl ScanApi for PdfCoClient {
    async fn upload(&self, capture: &CaptureResult) -> Result<UploadedAsset, ScanError> {
        upload_image(&self.http, &self.upload_url, &self.api_key, capture).await
    }

    async fn convert(&self, asset: &UploadedAsset) -> Result<ConvertedDocument, ScanError> {
        convert_image(&self.http, &self.convert_url, &self.api_key, asset).await
    }
}
