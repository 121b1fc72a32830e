use sqlx::PgPool;
use uuid::Uuid;

use super::collaboration_service::CollaborationService;
use super::template_service::TemplateService;
use crate::database::models::Briefing;
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Condition;
use crate::middleware::CurrentProfile;
use crate::types::{Operation, Resource};
use crate::validation::{BriefingForm, BriefingInput};

const BRIEFING_COLUMNS: &str = "id, organization_id, collaboration_id, campaign_goal, target_audience, deliverables, \
     hashtags, dos_donts, content_guidelines, posting_period_start, posting_period_end, compensation, notes, \
     created_at, updated_at";

/// One briefing per collaboration, addressed by the collaboration id
pub struct BriefingService {
    pool: PgPool,
    profile: CurrentProfile,
}

impl BriefingService {
    pub fn new(pool: PgPool, profile: CurrentProfile) -> Self {
        Self { pool, profile }
    }

    fn briefings(&self) -> Repository<Briefing> {
        Repository::new("briefings", self.profile.organization_id, self.pool.clone())
    }

    /// `None` when the collaboration has no briefing yet
    pub async fn get(&self, collaboration_id: Uuid) -> Result<Option<Briefing>, ApiError> {
        let access = self.profile.require(Resource::Briefing, Operation::Select)?;
        CollaborationService::new(self.pool.clone(), self.profile.clone())
            .find_visible(collaboration_id, self.profile.assigned_scope(access))
            .await?;

        let repo = self.briefings();
        let mut filter = repo.filter()?;
        filter.where_clause(Condition::eq("collaboration_id", collaboration_id));
        Ok(repo.select_one(filter).await?)
    }

    pub async fn create(&self, collaboration_id: Uuid, input: BriefingInput) -> Result<Briefing, ApiError> {
        self.profile.require(Resource::Briefing, Operation::Create)?;
        CollaborationService::new(self.pool.clone(), self.profile.clone())
            .find_visible(collaboration_id, None)
            .await?;

        let briefing = sqlx::query_as::<_, Briefing>(&format!(
            "INSERT INTO briefings (organization_id, collaboration_id, campaign_goal, target_audience, deliverables, \
             hashtags, dos_donts, content_guidelines, posting_period_start, posting_period_end, compensation, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {}",
            BRIEFING_COLUMNS
        ))
        .bind(self.profile.organization_id)
        .bind(collaboration_id)
        .bind(&input.campaign_goal)
        .bind(&input.target_audience)
        .bind(&input.deliverables)
        .bind(&input.hashtags)
        .bind(&input.dos_donts)
        .bind(&input.content_guidelines)
        .bind(input.posting_period_start)
        .bind(input.posting_period_end)
        .bind(&input.compensation)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "A briefing already exists for this collaboration"))?;

        tracing::info!("Created briefing {} for collaboration {}", briefing.id, collaboration_id);
        Ok(briefing)
    }

    /// Template fields fill whatever the request leaves blank
    pub async fn create_from_template(
        &self,
        collaboration_id: Uuid,
        template_id: Uuid,
        form: BriefingForm,
    ) -> Result<Briefing, ApiError> {
        self.profile.require(Resource::Briefing, Operation::Create)?;
        let template = TemplateService::new(self.pool.clone(), self.profile.clone()).get(template_id).await?;
        let input = form.with_template(&template.template_data.0).validate()?;
        self.create(collaboration_id, input).await
    }

    pub async fn update(&self, collaboration_id: Uuid, input: BriefingInput) -> Result<Briefing, ApiError> {
        self.profile.require(Resource::Briefing, Operation::Update)?;

        let briefing = sqlx::query_as::<_, Briefing>(&format!(
            "UPDATE briefings SET campaign_goal = $1, target_audience = $2, deliverables = $3, hashtags = $4, \
             dos_donts = $5, content_guidelines = $6, posting_period_start = $7, posting_period_end = $8, \
             compensation = $9, notes = $10, updated_at = now() \
             WHERE collaboration_id = $11 AND organization_id = $12 RETURNING {}",
            BRIEFING_COLUMNS
        ))
        .bind(&input.campaign_goal)
        .bind(&input.target_audience)
        .bind(&input.deliverables)
        .bind(&input.hashtags)
        .bind(&input.dos_donts)
        .bind(&input.content_guidelines)
        .bind(input.posting_period_start)
        .bind(input.posting_period_end)
        .bind(&input.compensation)
        .bind(&input.notes)
        .bind(collaboration_id)
        .bind(self.profile.organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Sqlx)?
        .ok_or_else(|| ApiError::not_found("Briefing not found"))?;

        tracing::info!("Updated briefing {}", briefing.id);
        Ok(briefing)
    }

    pub async fn delete(&self, collaboration_id: Uuid) -> Result<(), ApiError> {
        self.profile.require(Resource::Briefing, Operation::Delete)?;

        let result = sqlx::query("DELETE FROM briefings WHERE collaboration_id = $1 AND organization_id = $2")
            .bind(collaboration_id)
            .bind(self.profile.organization_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Briefing not found"));
        }

        tracing::info!("Deleted briefing of collaboration {}", collaboration_id);
        Ok(())
    }
}
