use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::BriefingTemplate;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::services::TemplateService;
use crate::types::{Operation, Resource};
use crate::validation::BriefingTemplateForm;

/// GET /api/briefing-templates
pub async fn list(Extension(profile): Extension<CurrentProfile>) -> ApiResult<Vec<BriefingTemplate>> {
    let pool = DatabaseManager::pool().await?;
    let templates = TemplateService::new(pool, profile).list().await?;
    Ok(ApiResponse::success(templates))
}

/// POST /api/briefing-templates
pub async fn create(
    Extension(profile): Extension<CurrentProfile>,
    body: Result<Json<BriefingTemplateForm>, JsonRejection>,
) -> ApiResult<BriefingTemplate> {
    profile.require(Resource::BriefingTemplate, Operation::Create)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let template = TemplateService::new(pool, profile).create(input).await?;
    Ok(ApiResponse::created(template))
}

/// PUT /api/briefing-templates/:id
pub async fn update(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<BriefingTemplateForm>, JsonRejection>,
) -> ApiResult<BriefingTemplate> {
    let Path(id) = path?;
    profile.require(Resource::BriefingTemplate, Operation::Update)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let template = TemplateService::new(pool, profile).update(id, input).await?;
    Ok(ApiResponse::success(template))
}

/// DELETE /api/briefing-templates/:id
pub async fn delete(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let pool = DatabaseManager::pool().await?;
    TemplateService::new(pool, profile).delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
