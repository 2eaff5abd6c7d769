//! LearnHub admin API client.
//!
//! Async HTTP gateway used by the admin console to reach the LearnHub
//! backend: JSON verbs over a configured base URL, tenant and bearer header
//! injection, per-request timeouts, transparent refresh-and-retry on expired
//! sessions, and multipart upload / binary download helpers.
//!
//! The access token lives in process memory only; the refresh token is an
//! HTTP-only cookie held by the embedded cookie store. One `ApiClient`
//! instance serves the whole process.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod services;
pub mod session;
pub mod types;


pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use form::MultipartPayload;
pub use session::TokenListener;
