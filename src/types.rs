//! Shared wire types for the LearnHub backend API.
//!
//! All structs use camelCase serialization to match the API's JSON format.
//! Endpoint-family-specific types live next to their service wrappers.

use serde::{Deserialize, Serialize};

/// Response from POST /api/auth/refresh. The new refresh token, if rotated,
/// arrives as an HTTP-only cookie and never appears in the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Login request body sent to POST /api/auth/login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Admin account as returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    /// `admin`, `instructor`, or `support`.
    pub role: String,
}

/// Login response from POST /api/auth/login (refresh token arrives as an
/// HTTP-only cookie).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: AdminUser,
}

/// Pagination envelope used by every list endpoint.
///
/// Decoded at the client boundary so a malformed envelope surfaces as a
/// decode error instead of missing fields downstream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
}
