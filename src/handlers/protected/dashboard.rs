use axum::extract::{rejection::QueryRejection, Extension, Query};

use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::services::dashboard_service::Dashboard;
use crate::services::{DashboardParams, DashboardService};

/// GET /api/dashboard?status= - overdue, upcoming and filtered collaborations
pub async fn get(
    Extension(profile): Extension<CurrentProfile>,
    query: Result<Query<DashboardParams>, QueryRejection>,
) -> ApiResult<Dashboard> {
    let Query(params) = query?;
    let pool = DatabaseManager::pool().await?;
    let dashboard = DashboardService::new(pool, profile).load(params).await?;
    Ok(ApiResponse::success(dashboard))
}
