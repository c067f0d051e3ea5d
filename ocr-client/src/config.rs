use std::env;
use std::time::Duration;

/// Default settings for the OCR service client.
#[derive(Debug, Clone, Copy)]
pub struct OcrClientDefaults {
    pub endpoint: &'static str,
    pub field_name: &'static str,
    pub timeout_secs: u64,
}

/// Shared defaults so CLI, GUI and tests stay in sync.
pub const OCR_CLIENT_DEFAULTS: OcrClientDefaults = OcrClientDefaults {
    endpoint: "http://localhost:8000/process-pdf",
    field_name: "file",
    timeout_secs: 120,
};

/// Environment variable that overrides the default endpoint.
pub const ENDPOINT_ENV_VAR: &str = "OCR_SERVICE_URL";

/// Runtime configuration for the OCR service client.
#[derive(Debug, Clone)]
pub struct OcrClientConfig {
    /// URL of the service's process endpoint.
    pub endpoint: String,
    /// Multipart field name the service expects the document under.
    pub field_name: String,
    /// Whole-request timeout, connect through body read.
    pub timeout: Duration,
}

/// Convenience helper to build an [`OcrClientConfig`] from the shared defaults.
///
/// The endpoint honors `OCR_SERVICE_URL` when set, so a non-local service can
/// be targeted without rebuilding.
pub fn default_client_config() -> OcrClientConfig {
    let endpoint =
        env::var(ENDPOINT_ENV_VAR).unwrap_or_else(|_| OCR_CLIENT_DEFAULTS.endpoint.to_string());

    OcrClientConfig {
        endpoint,
        field_name: OCR_CLIENT_DEFAULTS.field_name.to_string(),
        timeout: Duration::from_secs(OCR_CLIENT_DEFAULTS.timeout_secs),
    }
}
