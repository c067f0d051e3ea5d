use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::{debug, warn};

use ocr_model::{ApiErrorBody, ProcessResponse, ProcessedPage};

use crate::config::OcrClientConfig;

/// Message shown when the service rejects a document without saying why.
pub const FALLBACK_PROCESS_ERROR: &str = "Failed to process PDF";

/// Errors produced by OCR submission.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client configuration: {message}")]
    InvalidConfiguration { message: String },
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {status}")]
    Api { status: u16, detail: Option<String> },
    #[error("unexpected response body: {message}")]
    Decode { message: String },
}

impl ClientError {
    /// The single string a UI shows for this failure.
    ///
    /// A server-supplied `detail` is surfaced verbatim; a server rejection
    /// without detail maps to [`FALLBACK_PROCESS_ERROR`]; everything else
    /// renders its own Display text.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { detail: Some(detail), .. } => detail.clone(),
            ClientError::Api { detail: None, .. } => FALLBACK_PROCESS_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

/// Cooperative cancellation handle for an in-flight submission.
///
/// The blocking transport cannot be aborted mid-request; callers check the
/// token once the request settles and discard a stale outcome.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Blocking HTTP client for the PDF OCR service.
#[derive(Debug)]
pub struct OcrClient {
    config: OcrClientConfig,
    http: reqwest::blocking::Client,
}

impl OcrClient {
    pub fn new(config: OcrClientConfig) -> Result<Self, ClientError> {
        if config.endpoint.trim().is_empty() {
            return Err(ClientError::InvalidConfiguration {
                message: "endpoint must not be empty".into(),
            });
        }
        if config.field_name.trim().is_empty() {
            return Err(ClientError::InvalidConfiguration {
                message: "multipart field name must not be empty".into(),
            });
        }
        if config.timeout.is_zero() {
            return Err(ClientError::InvalidConfiguration {
                message: "timeout must be greater than zero".into(),
            });
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, http })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Submit the PDF at `path` and return the recognized pages in server order.
    pub fn process_pdf(&self, path: &Path) -> Result<Vec<ProcessedPage>, ClientError> {
        let bytes = std::fs::read(path).map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.pdf")
            .to_string();
        self.process_pdf_bytes(bytes, &file_name)
    }

    /// Submit in-memory PDF bytes under the given file name.
    pub fn process_pdf_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Vec<ProcessedPage>, ClientError> {
        debug!(
            endpoint = %self.config.endpoint,
            file = file_name,
            size = bytes.len(),
            "submitting PDF for OCR"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part(self.config.field_name.clone(), part);

        let response = self
            .http
            .post(&self.config.endpoint)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are best-effort JSON; anything unparseable falls
            // back to the fixed message via user_message().
            let body = response.text().unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.detail);
            warn!(status = status.as_u16(), "service rejected the submission");
            return Err(ClientError::Api { status: status.as_u16(), detail });
        }

        let body = response.text()?;
        let parsed: ProcessResponse = serde_json::from_str(&body)
            .map_err(|err| ClientError::Decode { message: err.to_string() })?;
        debug!(pages = parsed.pages.len(), "service returned OCR pages");
        Ok(parsed.pages)
    }
}
