use axum::extract::Extension;

use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::services::user_service::Me;
use crate::services::UserService;

/// GET /api/me - caller profile and organization
pub async fn get(Extension(profile): Extension<CurrentProfile>) -> ApiResult<Me> {
    let pool = DatabaseManager::pool().await?;
    let me = UserService::new(pool, profile).me().await?;
    Ok(ApiResponse::success(me))
}
