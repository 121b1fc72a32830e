use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Contact;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentProfile};
use crate::types::{Operation, Resource};
use crate::services::ContactService;
use crate::validation::ContactForm;

/// GET /api/companies/:id/contacts
pub async fn list(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Vec<Contact>> {
    let Path(company_id) = path?;
    let pool = DatabaseManager::pool().await?;
    let contacts = ContactService::new(pool, profile).list_for_company(company_id).await?;
    Ok(ApiResponse::success(contacts))
}

/// POST /api/companies/:id/contacts
pub async fn create(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<Contact> {
    let Path(company_id) = path?;
    profile.require(Resource::Contact, Operation::Create)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let contact = ContactService::new(pool, profile).create(company_id, input).await?;
    Ok(ApiResponse::created(contact))
}

/// PUT /api/contacts/:id
pub async fn update(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<Contact> {
    let Path(id) = path?;
    profile.require(Resource::Contact, Operation::Update)?;
    let Json(form) = body?;
    let input = form.validate()?;
    let pool = DatabaseManager::pool().await?;
    let contact = ContactService::new(pool, profile).update(id, input).await?;
    Ok(ApiResponse::success(contact))
}

/// DELETE /api/contacts/:id
pub async fn delete(
    Extension(profile): Extension<CurrentProfile>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let pool = DatabaseManager::pool().await?;
    ContactService::new(pool, profile).delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
