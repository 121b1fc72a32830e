use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Briefing;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::services::BriefingService;
use crate::types::{Operation, Resource};
use crate::validation::BriefingForm;

/// GET /api/collaborations/:id/briefing - `data` is null when no briefing exists
pub async fn get(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Option<Briefing>> {
    let Path(collaboration_id) = path?;
    let pool = DatabaseManager::pool().await?;
    let briefing = BriefingService::new(pool, profile).get(collaboration_id).await?;
    Ok(ApiResponse::success(briefing))
}

/// POST /api/collaborations/:id/briefing
pub async fn create(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<BriefingForm>, JsonRejection>,
) -> ApiResult<Briefing> {
    let Path(collaboration_id) = path?;
    profile.require(Resource::Briefing, Operation::Create)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let briefing = BriefingService::new(pool, profile).create(collaboration_id, input).await?;
    Ok(ApiResponse::created(briefing))
}

/// POST /api/collaborations/:id/briefing/from-template/:template_id - body fields override the template
pub async fn create_from_template(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Option<Json<BriefingForm>>,
) -> ApiResult<Briefing> {
    let Path((collaboration_id, template_id)) = path?;
    profile.require(Resource::Briefing, Operation::Create)?;
    let form = body.map(|Json(form)| form).unwrap_or_default();
    let pool = DatabaseManager::pool().await?;
    let briefing = BriefingService::new(pool, profile)
        .create_from_template(collaboration_id, template_id, form)
        .await?;
    Ok(ApiResponse::created(briefing))
}

/// PUT /api/collaborations/:id/briefing
pub async fn update(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<BriefingForm>, JsonRejection>,
) -> ApiResult<Briefing> {
    let Path(collaboration_id) = path?;
    profile.require(Resource::Briefing, Operation::Update)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let briefing = BriefingService::new(pool, profile).update(collaboration_id, input).await?;
    Ok(ApiResponse::success(briefing))
}

/// DELETE /api/collaborations/:id/briefing
pub async fn delete(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(collaboration_id) = path?;
    let pool = DatabaseManager::pool().await?;
    BriefingService::new(pool, profile).delete(collaboration_id).await?;
    Ok(ApiResponse::success(json!({ "collaboration_id": collaboration_id, "deleted": true })))
}
