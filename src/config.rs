//! Client configuration from environment variables.
//!
//! Base URL layering: `LEARNHUB_ADMIN_API_URL` > `LEARNHUB_API_URL` >
//! localhost default. A `.env` file in the working directory is loaded
//! best-effort so local development shares variables with the console.

use std::time::Duration;

/// Default backend address for local development.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Per-request timeout applied to JSON and form-data calls.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`ApiClient`](crate::client::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, no trailing slash.
    pub base_url: String,
    /// Value of the `X-Tenant-Domain` header, identifying which customer
    /// site a request applies to. Defaults to the base URL's `host[:port]`.
    pub tenant_domain: String,
    /// Timeout for JSON and form-data requests. Upload and download
    /// helpers are deliberately unbounded.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config for the given base URL with defaults for the rest.
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let tenant_domain = host_of(&base_url);
        Self {
            base_url,
            tenant_domain,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build a config from environment variables.
    ///
    /// Reads `LEARNHUB_ADMIN_API_URL`, then `LEARNHUB_API_URL`, then falls
    /// back to the localhost default. `LEARNHUB_TENANT_DOMAIN` overrides the
    /// tenant derived from the base URL; `LEARNHUB_API_TIMEOUT_SECS`
    /// overrides the request timeout.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("LEARNHUB_ADMIN_API_URL")
            .or_else(|_| std::env::var("LEARNHUB_API_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(&base_url);

        if let Ok(tenant) = std::env::var("LEARNHUB_TENANT_DOMAIN") {
            if !tenant.is_empty() {
                config.tenant_domain = tenant;
            }
        }
        if let Some(secs) = std::env::var("LEARNHUB_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Override the tenant domain (multi-tenant embedders).
    pub fn with_tenant_domain(mut self, tenant_domain: impl Into<String>) -> Self {
        self.tenant_domain = tenant_domain.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Extract `host[:port]` from a URL, the native analogue of the browser's
/// `window.location.host`. Falls back to the input string when it does not
/// parse as a URL.
fn host_of(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_string();
            match parsed.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host,
            }
        }
        Err(_) => url.to_string(),
    }
}
