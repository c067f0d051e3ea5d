//! HTTP client for the PDF OCR service.

pub mod client;
pub mod config;
