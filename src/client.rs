//! HTTP client with tenant/auth header injection and transparent token refresh.
//!
//! All admin console traffic funnels through `ApiClient`. Every request
//! carries the `X-Tenant-Domain` header and, when a session is active, an
//! `Authorization: Bearer` header. A 401 triggers exactly one silent refresh
//! against POST /api/auth/refresh (the refresh token travels as an HTTP-only
//! cookie in the client's cookie store) followed by exactly one retry of the
//! original request.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{server_message, ApiError};
use crate::form::MultipartPayload;
use crate::session::{Session, TokenListener};
use crate::types::RefreshResponse;

/// Header identifying which customer site a request applies to.
pub const TENANT_HEADER: &str = "x-tenant-domain";

/// Refresh endpoint; no body, relies on the HTTP-only refresh cookie.
const REFRESH_PATH: &str = "/api/auth/refresh";

/// HTTP client wrapper for LearnHub admin API communication.
///
/// One long-lived instance per process. Holds the only piece of mutable
/// process-wide state (the access token, via [`Session`]) and the reqwest
/// cookie store carrying the refresh token.
pub struct ApiClient {
    http: Client,
    base_url: String,
    tenant_domain: String,
    timeout: Duration,
    session: Session,
    /// Serializes concurrent refresh attempts so parallel 401s coalesce
    /// into a single call to the refresh endpoint.
    refresh_gate: tokio::sync::Mutex<()>,
}

impl ApiClient {
    /// Create a client from the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tenant_domain: config.tenant_domain,
            timeout: config.timeout,
            session: Session::new(),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tenant_domain(&self) -> &str {
        &self.tenant_domain
    }

    /// Store the access token (after login). Does not fire the refresh
    /// listener.
    pub async fn set_access_token(&self, token: String) {
        self.session.set_token(token).await;
    }

    /// Clear the access token (logout).
    pub async fn clear_access_token(&self) {
        self.session.clear_token().await;
    }

    /// Snapshot of the current access token.
    pub async fn access_token(&self) -> Option<String> {
        self.session.current().await
    }

    /// Register a callback fired whenever a transparent refresh replaces the
    /// token, so application-level session state stays in sync.
    pub fn set_token_refresh_listener(&self, listener: TokenListener) {
        self.session.set_listener(listener);
    }

    // ── Verb methods ─────────────────────────────────────────────────────

    /// GET a JSON endpoint. Use `serde_json::Value` as `T` for endpoints
    /// whose body is irrelevant.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path, None, &[]).await?;
        decode(value)
    }

    /// POST a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        let value = self.request(Method::POST, path, Some(&body), &[]).await?;
        decode(value)
    }

    /// PUT a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        let value = self.request(Method::PUT, path, Some(&body), &[]).await?;
        decode(value)
    }

    /// PATCH a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        let value = self.request(Method::PATCH, path, Some(&body), &[]).await?;
        decode(value)
    }

    /// DELETE an endpoint. Body-less 2xx responses decode as an empty object,
    /// so `serde_json::Value` is the usual `T`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::DELETE, path, None, &[]).await?;
        decode(value)
    }

    // ── Request primitive ────────────────────────────────────────────────

    /// Generic JSON request all verb methods funnel through.
    ///
    /// Applies the configured timeout, the tenant/bearer headers, and the
    /// 401-refresh-and-retry protocol. Returns the parsed JSON body; non-JSON
    /// 2xx responses yield an empty object.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let url = self.resolve_url(path);
        log::debug!("{} {}", method, url);

        let response = self
            .send_with_refresh(|token| {
                let headers = self.build_headers(token, body.is_some(), extra_headers);
                let mut builder = self
                    .http
                    .request(method.clone(), &url)
                    .headers(headers)
                    .timeout(self.timeout);
                if let Some(body) = body {
                    builder = builder.json(body);
                }
                Ok(builder)
            })
            .await?;

        if !response.status().is_success() {
            return Err(classify_status(response).await);
        }
        decode_body(response).await
    }

    // ── Specialized operations ───────────────────────────────────────────

    /// Upload a single file with optional flat extra fields as multipart
    /// form data. The file travels under the `file` field. No timeout is
    /// applied: large uploads can legitimately exceed the request budget.
    pub async fn upload_file(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: Option<&str>,
        extra_fields: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        let mut payload =
            MultipartPayload::new().file("file", file_name, mime.map(str::to_string), bytes);
        for (name, value) in extra_fields {
            payload = payload.text(*name, *value);
        }
        self.send_multipart(path, &payload, None).await
    }

    /// POST a caller-assembled multipart payload, with the same timeout and
    /// refresh semantics as the JSON path.
    pub async fn post_form_data(
        &self,
        path: &str,
        payload: &MultipartPayload,
    ) -> Result<Value, ApiError> {
        self.send_multipart(path, payload, Some(self.timeout)).await
    }

    /// Fetch a binary payload (parameterized exports default to POST).
    /// Unbounded: no timeout. On a non-2xx response the error body is parsed
    /// as JSON (preferring the server's `detail` field) and falls back to the
    /// raw text.
    pub async fn download_file(
        &self,
        path: &str,
        method: Option<Method>,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, ApiError> {
        let method = method.unwrap_or(Method::POST);
        let url = self.resolve_url(path);
        log::debug!("{} {} (download)", method, url);

        let response = self
            .send_with_refresh(|token| {
                let headers = self.build_headers(token, body.is_some(), &[]);
                let mut builder = self.http.request(method.clone(), &url).headers(headers);
                if let Some(body) = body {
                    builder = builder.json(body);
                }
                Ok(builder)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<Value>(&text) {
                Ok(parsed) => {
                    let message = server_message(&parsed, text.trim());
                    ApiError::Status {
                        status,
                        message,
                        payload: Some(parsed),
                    }
                }
                Err(_) => {
                    let message = if text.trim().is_empty() {
                        format!("download failed with status {}", status)
                    } else {
                        text.trim().to_string()
                    };
                    ApiError::Status {
                        status,
                        message,
                        payload: None,
                    }
                }
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read download body: {}", e)))?;
        Ok(bytes.to_vec())
    }

    // ── Internals ────────────────────────────────────────────────────────

    async fn send_multipart(
        &self,
        path: &str,
        payload: &MultipartPayload,
        timeout: Option<Duration>,
    ) -> Result<Value, ApiError> {
        let url = self.resolve_url(path);
        log::debug!("POST {} (multipart)", url);

        let response = self
            .send_with_refresh(|token| {
                // No JSON content type: reqwest sets the multipart boundary.
                let headers = self.build_headers(token, false, &[]);
                let mut builder = self
                    .http
                    .post(&url)
                    .headers(headers)
                    .multipart(payload.to_form()?);
                if let Some(timeout) = timeout {
                    builder = builder.timeout(timeout);
                }
                Ok(builder)
            })
            .await?;

        if !response.status().is_success() {
            return Err(classify_status(response).await);
        }
        decode_body(response).await
    }

    /// Send a request, refreshing the access token and retrying exactly once
    /// if the first attempt comes back 401.
    ///
    /// The builder closure is invoked once per attempt so the request body
    /// (JSON or multipart) and headers are rebuilt with the token in effect
    /// for that attempt.
    async fn send_with_refresh<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(Option<&str>) -> Result<reqwest::RequestBuilder, ApiError>,
    {
        let token = self.session.current().await;
        let response = build(token.as_deref())?
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        log::info!("request unauthorized, attempting silent token refresh");
        let fresh = self.refresh_access_token(token).await?;

        let retried = build(Some(&fresh))?
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if retried.status() == StatusCode::UNAUTHORIZED {
            log::warn!("request still unauthorized after token refresh");
            return Err(ApiError::Authentication(
                "session expired: request rejected after token refresh".to_string(),
            ));
        }
        Ok(retried)
    }

    /// Call the refresh endpoint and store the new access token.
    ///
    /// `observed` is the token the failed attempt used. Concurrent 401s
    /// serialize on the refresh gate; whoever enters after a successful
    /// refresh sees a token different from the one it observed and reuses it
    /// instead of refreshing again. Any failure here is terminal for the
    /// request: no second refresh, no backoff.
    async fn refresh_access_token(&self, observed: Option<String>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.session.current().await {
            if observed.as_deref() != Some(current.as_str()) {
                log::debug!("token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let url = self.resolve_url(REFRESH_PATH);
        let headers = self.build_headers(None, false, &[]);
        let response = self
            .http
            .post(&url)
            .headers(headers)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Authentication(format!("token refresh failed: {}", e)))?;

        if !response.status().is_success() {
            log::warn!("token refresh rejected with status {}", response.status());
            return Err(ApiError::Authentication(format!(
                "token refresh failed with status {}",
                response.status().as_u16()
            )));
        }

        let refresh: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Authentication(format!("invalid refresh response: {}", e)))?;

        self.session
            .replace_from_refresh(refresh.access_token.clone())
            .await;
        log::info!("access token refreshed");
        Ok(refresh.access_token)
    }

    /// Absolute paths (carrying a URL scheme) pass through verbatim;
    /// everything else is prefixed with the configured base URL.
    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Assemble headers for one attempt: JSON content type when a JSON body
    /// is present, tenant domain always, bearer token when held, then
    /// caller-supplied extras. Unrepresentable extra headers are dropped.
    fn build_headers(
        &self,
        token: Option<&str>,
        json_body: bool,
        extra: &[(String, String)],
    ) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if json_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Ok(tenant) = HeaderValue::from_str(&self.tenant_domain) {
            headers.insert(TENANT_HEADER, tenant);
        }
        if let Some(token) = token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        for (name, value) in extra {
            if let (Ok(name), Ok(value)) = (
                name.parse::<HeaderName>(),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        headers
    }
}

/// Serialize a request body, surfacing serialization failures as decode
/// errors rather than panicking.
fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("invalid request body: {}", e)))
}

/// Deserialize a parsed JSON value into the caller's type.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Parse a 2xx body: JSON content types are decoded, anything else yields an
/// empty object so body-less responses (e.g. DELETE) cost callers nothing.
async fn decode_body(response: Response) -> Result<Value, ApiError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("json"))
        .unwrap_or(false);

    if !is_json {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Translate a non-2xx, non-401 response into a typed error, preferring the
/// server's `detail`/`message` fields and keeping the raw JSON payload.
async fn classify_status(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let fallback = format!("request failed with status {}", status);

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => {
            let message = server_message(&body, &fallback);
            ApiError::Status {
                status,
                message,
                payload: Some(body),
            }
        }
        Err(_) => ApiError::Status {
            status,
            message: fallback,
            payload: None,
        },
    }
}
