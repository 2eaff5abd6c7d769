//! User management endpoints.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::Paginated;

/// Row of the admin user table from GET /api/users.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
}

/// List users, optionally filtered by a search term.
///
/// GET /api/users?page={page}[&search={term}]
pub async fn list_users(
    client: &ApiClient,
    page: u64,
    search: Option<&str>,
) -> Result<Paginated<UserSummary>, ApiError> {
    let mut path = format!("/api/users?page={}", page);
    if let Some(term) = search {
        path.push_str(&format!("&search={}", urlencoding::encode(term)));
    }
    client.get(&path).await
}
