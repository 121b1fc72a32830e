use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::models::BriefingTemplate;
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::{FilterOrderInfo, SortDirection};
use crate::middleware::CurrentProfile;
use crate::types::{Operation, Resource};
use crate::validation::BriefingTemplateInput;

const TEMPLATE_COLUMNS: &str = "id, organization_id, name, template_data, created_at, updated_at";

pub struct TemplateService {
    pool: PgPool,
    profile: CurrentProfile,
}

impl TemplateService {
    pub fn new(pool: PgPool, profile: CurrentProfile) -> Self {
        Self { pool, profile }
    }

    fn templates(&self) -> Repository<BriefingTemplate> {
        Repository::new("briefing_templates", self.profile.organization_id, self.pool.clone())
    }

    pub async fn list(&self) -> Result<Vec<BriefingTemplate>, ApiError> {
        self.profile.require(Resource::BriefingTemplate, Operation::Select)?;
        let repo = self.templates();
        let mut filter = repo.filter()?;
        filter
            .order(FilterOrderInfo { column: "name".into(), sort: SortDirection::Asc, nulls: None })
            .limit(i64::from(config::config().api.options_limit), None)?;
        Ok(repo.select_any(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<BriefingTemplate, ApiError> {
        self.profile.require(Resource::BriefingTemplate, Operation::Select)?;
        let repo = self.templates();
        Ok(repo.select_404(repo.by_id(id)?, "Template not found").await?)
    }

    pub async fn create(&self, input: BriefingTemplateInput) -> Result<BriefingTemplate, ApiError> {
        self.profile.require(Resource::BriefingTemplate, Operation::Create)?;

        let template = sqlx::query_as::<_, BriefingTemplate>(&format!(
            "INSERT INTO briefing_templates (organization_id, name, template_data) VALUES ($1, $2, $3) RETURNING {}",
            TEMPLATE_COLUMNS
        ))
        .bind(self.profile.organization_id)
        .bind(&input.name)
        .bind(Json(&input.template_data))
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

        tracing::info!("Created briefing template {} ({})", template.id, template.name);
        Ok(template)
    }

    pub async fn update(&self, id: Uuid, input: BriefingTemplateInput) -> Result<BriefingTemplate, ApiError> {
        self.profile.require(Resource::BriefingTemplate, Operation::Update)?;

        let template = sqlx::query_as::<_, BriefingTemplate>(&format!(
            "UPDATE briefing_templates SET name = $1, template_data = $2, updated_at = now() \
             WHERE id = $3 AND organization_id = $4 RETURNING {}",
            TEMPLATE_COLUMNS
        ))
        .bind(&input.name)
        .bind(Json(&input.template_data))
        .bind(id)
        .bind(self.profile.organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Sqlx)?
        .ok_or_else(|| ApiError::not_found("Template not found"))?;

        tracing::info!("Updated briefing template {}", id);
        Ok(template)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.profile.require(Resource::BriefingTemplate, Operation::Delete)?;

        let result = sqlx::query("DELETE FROM briefing_templates WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(self.profile.organization_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Template not found"));
        }

        tracing::info!("Deleted briefing template {}", id);
        Ok(())
    }
}
