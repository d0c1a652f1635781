//! Data carried between the stages of a scan.
//!
//! All three types are transient: a [`CaptureResult`] is consumed by the
//! upload stage, an [`UploadedAsset`] by the convert stage, and a
//! [`ConvertedDocument`] lives in [`crate::state::WorkflowState::Succeeded`]
//! until the next scan resets it. Nothing is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One captured image: raw bytes plus the media type the capture source declared.
#[derive(Clone, PartialEq, Eq)]
pub struct CaptureResult {
    /// File name sent as the multipart part's `filename`.
    pub file_name: String,
    /// Declared media type, e.g. `image/jpeg`. Not sniffed from the bytes.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl CaptureResult {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// True when the declared media type starts with `image/`.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

impl fmt::Debug for CaptureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureResult")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Upload endpoint response: where the vendor stored the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    /// Durable URL of the uploaded image.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub error: bool,
    /// Status code echoed in the payload (not the HTTP status line).
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub remaining_credits: i64,
}

/// Convert endpoint response: where the vendor put the generated PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedDocument {
    /// URL of the generated PDF. This is the link shown to the user.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_credits: Option<i64>,
}

/// JSON body of the convert request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ConvertRequest<'a> {
    pub url: &'a str,
    /// Always `false`: the call blocks until the PDF exists.
    #[serde(rename = "async")]
    pub is_async: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_media_types() {
        assert!(CaptureResult::new("a.jpg", "image/jpeg", vec![1]).is_image());
        assert!(CaptureResult::new("a.heic", "image/heic", vec![1]).is_image());
        assert!(!CaptureResult::new("a.txt", "text/plain", vec![1]).is_image());
        assert!(!CaptureResult::new("a", "", vec![]).is_image());
        // The check is a plain prefix match, like the browser's `type.startsWith`.
        assert!(!CaptureResult::new("a.jpg", "IMAGE/JPEG", vec![1]).is_image());
    }

    #[test]
    fn debug_hides_payload() {
        let c = CaptureResult::new("scan.jpg", "image/jpeg", vec![0u8; 2048]);
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<2048 bytes>"), "got: {dbg}");
        assert!(!dbg.contains("0, 0, 0"));
    }

    #[test]
    fn upload_response_parses_vendor_json() {
        let json = r#"{
            "url": "https://x/img.jpg",
            "error": false,
            "status": 200,
            "name": "img.jpg",
            "remainingCredits": 9990
        }"#;
        let asset: UploadedAsset = serde_json::from_str(json).expect("valid json");
        assert_eq!(asset.url, "https://x/img.jpg");
        assert!(!asset.error);
        assert_eq!(asset.status, 200);
        assert_eq!(asset.remaining_credits, 9990);
    }

    #[test]
    fn convert_response_tolerates_missing_fields() {
        let doc: ConvertedDocument =
            serde_json::from_str(r#"{"error": true, "status": 400}"#).expect("valid json");
        assert!(doc.error);
        assert!(doc.url.is_empty());
        assert_eq!(doc.page_count, None);
    }

    #[test]
    fn convert_request_uses_async_key() {
        let body = serde_json::to_value(ConvertRequest {
            url: "https://x/img.jpg",
            is_async: false,
        })
        .expect("serialisable");
        assert_eq!(
            body,
            serde_json::json!({ "url": "https://x/img.jpg", "async": false })
        );
    }
}
