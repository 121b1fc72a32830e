use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Extension, Json, Path, Query,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::Page;
use crate::database::models::CollaborationWithRelations;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::services::collaboration_service::CollaborationOptions;
use crate::services::{CollaborationListParams, CollaborationService};
use crate::types::{Operation, Resource};
use crate::validation::{CollaborationForm, CollaborationPatch, StatusForm};

/// GET /api/collaborations?search=&status=&company_id=&influencer_id=&sort=&order=&page=&limit=
pub async fn list(
    Extension(profile): Extension<CurrentProfile>,
    query: Result<Query<CollaborationListParams>, QueryRejection>,
) -> ApiResult<Page<CollaborationWithRelations>> {
    let Query(params) = query?;
    let pool = DatabaseManager::pool().await?;
    let page = CollaborationService::new(pool, profile).list(params).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/collaborations
pub async fn create(
    Extension(profile): Extension<CurrentProfile>,
    body: Result<Json<CollaborationForm>, JsonRejection>,
) -> ApiResult<CollaborationWithRelations> {
    profile.require(Resource::Collaboration, Operation::Create)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let collaboration = CollaborationService::new(pool, profile).create(input).await?;
    Ok(ApiResponse::created(collaboration))
}

/// GET /api/collaborations/options - companies and influencers for the form
pub async fn options(Extension(profile): Extension<CurrentProfile>) -> ApiResult<CollaborationOptions> {
    let pool = DatabaseManager::pool().await?;
    let options = CollaborationService::new(pool, profile).options().await?;
    Ok(ApiResponse::success(options))
}

/// GET /api/collaborations/:id
pub async fn get(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<CollaborationWithRelations> {
    let Path(id) = path?;
    let pool = DatabaseManager::pool().await?;
    let collaboration = CollaborationService::new(pool, profile).get(id).await?;
    Ok(ApiResponse::success(collaboration))
}

/// PUT /api/collaborations/:id - partial update, absent fields stay unchanged
pub async fn update(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CollaborationPatch>, JsonRejection>,
) -> ApiResult<CollaborationWithRelations> {
    let Path(id) = path?;
    profile.require(Resource::Collaboration, Operation::Update)?;
    let Json(patch) = body?;
    let changes = patch.validate()?;
    let pool = DatabaseManager::pool().await?;
    let collaboration = CollaborationService::new(pool, profile).update(id, changes).await?;
    Ok(ApiResponse::success(collaboration))
}

/// PATCH /api/collaborations/:id/status
pub async fn update_status(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<StatusForm>, JsonRejection>,
) -> ApiResult<CollaborationWithRelations> {
    let Path(id) = path?;
    profile.require(Resource::Collaboration, Operation::UpdateStatus)?;
    let Json(form) = body?;
    let status = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let collaboration = CollaborationService::new(pool, profile).update_status(id, status).await?;
    Ok(ApiResponse::success(collaboration))
}

/// DELETE /api/collaborations/:id - the briefing goes with it
pub async fn delete(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let pool = DatabaseManager::pool().await?;
    CollaborationService::new(pool, profile).delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
