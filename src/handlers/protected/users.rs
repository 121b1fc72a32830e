use axum::extract::{rejection::QueryRejection, Extension, Query};

use crate::database::models::UserProfile;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::services::{UserListParams, UserService};

/// GET /api/users?role= - organization members (agency admin only)
pub async fn list(
    Extension(profile): Extension<CurrentProfile>,
    query: Result<Query<UserListParams>, QueryRejection>,
) -> ApiResult<Vec<UserProfile>> {
    let Query(params) = query?;
    let pool = DatabaseManager::pool().await?;
    let users = UserService::new(pool, profile).list(params).await?;
    Ok(ApiResponse::success(users))
}
