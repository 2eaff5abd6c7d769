//! Site settings endpoints.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ApiError;

/// SMTP configuration body for POST /api/admin/settings/email/test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub from_address: String,
}

/// Outcome of a test email delivery attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTestResponse {
    pub success: bool,
    pub message: String,
    /// Transport-level diagnostics when the SMTP handshake failed.
    #[serde(default)]
    pub details: Option<String>,
}

/// Send a test email through the given SMTP configuration.
pub async fn send_test_email(
    client: &ApiClient,
    config: &SmtpConfig,
) -> Result<EmailTestResponse, ApiError> {
    client.post("/api/admin/settings/email/test", config).await
}
