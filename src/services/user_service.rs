use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::database::models::{Organization, UserProfile, UserRole};
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::{Condition, FilterOrderInfo, SortDirection};
use crate::middleware::CurrentProfile;
use crate::types::{Operation, Resource};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Me {
    pub profile: UserProfile,
    pub organization: Organization,
}

pub struct UserService {
    pool: PgPool,
    profile: CurrentProfile,
}

impl UserService {
    pub fn new(pool: PgPool, profile: CurrentProfile) -> Self {
        Self { pool, profile }
    }

    pub async fn me(&self) -> Result<Me, ApiError> {
        let profiles: Repository<UserProfile> =
            Repository::new("user_profiles", self.profile.organization_id, self.pool.clone());
        let profile = profiles
            .select_404(profiles.by_id(self.profile.id)?, "User profile not found")
            .await?;

        let organization = sqlx::query_as::<_, Organization>("SELECT id, name, created_at FROM organizations WHERE id = $1")
            .bind(self.profile.organization_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Sqlx)?
            .ok_or_else(|| ApiError::not_found("Organization not found"))?;

        Ok(Me { profile, organization })
    }

    /// Organization members, optionally narrowed to one role
    pub async fn list(&self, params: UserListParams) -> Result<Vec<UserProfile>, ApiError> {
        self.profile.require(Resource::User, Operation::Select)?;

        let repo: Repository<UserProfile> =
            Repository::new("user_profiles", self.profile.organization_id, self.pool.clone());
        let mut filter = repo.filter()?;
        if let Some(raw) = params.role.as_deref().map(str::trim).filter(|r| !r.is_empty() && *r != "all") {
            let role: UserRole = raw
                .parse()
                .map_err(|_| ApiError::field_error("role", "Invalid role"))?;
            filter.where_clause(Condition::eq("role", role.as_str()));
        }
        filter.order(FilterOrderInfo { column: "full_name".into(), sort: SortDirection::Asc, nulls: None });

        Ok(repo.select_any(filter).await?)
    }
}
