use thiserror::Error;

/// Local validation failures raised before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("unsupported file type `{extension}` (expected pdf or docx)")]
    UnsupportedFileType { extension: String },
}

/// Failures between sending the request and holding a decoded result.
///
/// None of these carry detail meant for the user; the surface only shows a
/// generic notice.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to analysis service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("analysis service returned status {status}")]
    Status { status: u16 },
    #[error("malformed analysis response: {0}")]
    Malformed(String),
}
