//! Session lifecycle endpoints: login and logout.
//!
//! Login stores the access token in the client; the refresh token arrives as
//! an HTTP-only cookie in the client's cookie store. Logout is best-effort
//! against the server and always clears the local token.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{AdminUser, LoginRequest, LoginResponse};

/// Authenticate against POST /api/auth/login and store the access token.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<AdminUser, ApiError> {
    let request = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };

    let response: LoginResponse = client.post("/api/auth/login", &request).await?;
    client.set_access_token(response.access_token).await;

    log::info!("logged in as {}", response.user.email);
    Ok(response.user)
}

/// Log out: invalidate the server session, then clear the local token.
///
/// The server call is best-effort; local cleanup runs even when the backend
/// is unreachable.
pub async fn logout(client: &ApiClient) {
    let result = client
        .post::<serde_json::Value, _>("/api/auth/logout", &serde_json::json!({}))
        .await;
    if let Err(e) = result {
        log::warn!("logout request failed (continuing local cleanup): {}", e);
    }

    client.clear_access_token().await;
    log::info!("logged out");
}
