use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Extension, Json, Path, Query,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::Page;
use crate::database::models::{Company, CompanyOverview, CompanyWithContacts};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::types::{Operation, Resource};
use crate::services::{CompanyListParams, CompanyService};
use crate::validation::CompanyForm;

/// GET /api/companies?search=&page=&limit=
pub async fn list(
    Extension(profile): Extension<CurrentProfile>,
    query: Result<Query<CompanyListParams>, QueryRejection>,
) -> ApiResult<Page<CompanyOverview>> {
    let Query(params) = query?;
    let pool = DatabaseManager::pool().await?;
    let page = CompanyService::new(pool, profile).list(params).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/companies
pub async fn create(
    Extension(profile): Extension<CurrentProfile>,
    body: Result<Json<CompanyForm>, JsonRejection>,
) -> ApiResult<Company> {
    profile.require(Resource::Company, Operation::Create)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let (company, warning) = CompanyService::new(pool, profile).create(input).await?;
    Ok(ApiResponse::created(company).warning(warning))
}

/// GET /api/companies/:id - company with its contacts
pub async fn get(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<CompanyWithContacts> {
    let Path(id) = path?;
    let pool = DatabaseManager::pool().await?;
    let company = CompanyService::new(pool, profile).get(id).await?;
    Ok(ApiResponse::success(company))
}

/// PUT /api/companies/:id
pub async fn update(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CompanyForm>, JsonRejection>,
) -> ApiResult<Company> {
    let Path(id) = path?;
    profile.require(Resource::Company, Operation::Update)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let (company, warning) = CompanyService::new(pool, profile).update(id, input).await?;
    Ok(ApiResponse::success(company).warning(warning))
}

/// DELETE /api/companies/:id
pub async fn delete(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let pool = DatabaseManager::pool().await?;
    CompanyService::new(pool, profile).delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
