//! Shared wire models for the PDF OCR service

use serde::{Deserialize, Serialize};

/// OCR output for a single page of a submitted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedPage {
    /// 1-based page number as reported by the service.
    pub page_number: u32,
    /// Recognized text for the page.
    pub text: String,
}

impl ProcessedPage {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self { page_number, text: text.into() }
    }
}

/// Success body returned by the service.
///
/// The service also reports `status` and `message` alongside `pages`;
/// both are optional on the wire so a body carrying only `pages` still
/// deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub pages: Vec<ProcessedPage>,
}

/// Error body returned by the service on a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable reason; absent on some failures.
    #[serde(default)]
    pub detail: Option<String>,
}
