use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::{Page, PageRequest, Pagination};
use crate::config;
use crate::database::models::{
    CollaborationDetailsRow, CollaborationStatus, CollaborationWithRelations, Company, CompanyRef, InfluencerRef,
};
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::{Condition, Filter, FilterError, FilterOrder, FilterOrderInfo, SortDirection};
use crate::middleware::CurrentProfile;
use crate::types::{Operation, Resource};
use crate::validation::{
    normalize, parse_uuid, CollaborationChanges, CollaborationInput, ValidationErrors,
};

pub const COLLABORATION_VIEW: &str = "collaboration_details";

/// Columns a collaboration listing may be sorted by
pub const SORTABLE_COLUMNS: &[&str] = &["created_at", "updated_at", "title", "status", "deadline"];

/// Raw query string of `GET /api/collaborations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollaborationListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub company_id: Option<String>,
    pub influencer_id: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort: Option<String>,
    #[serde(alias = "sortOrder", alias = "direction")]
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Overdue,
    Is(CollaborationStatus),
}

impl StatusFilter {
    /// `all` or blank means no restriction
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationErrors> {
        let raw = raw.map(str::trim).unwrap_or("");
        match raw {
            "" | "all" => Ok(StatusFilter::All),
            "overdue" => Ok(StatusFilter::Overdue),
            other => other.parse::<CollaborationStatus>().map(StatusFilter::Is).map_err(|_| {
                let mut errors = ValidationErrors::new();
                errors.add("status", "Invalid status filter");
                errors
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollaborationFilters {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub company_id: Option<Uuid>,
    pub influencer_id: Option<Uuid>,
}

impl CollaborationFilters {
    pub fn from_params(params: &CollaborationListParams) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let status = match StatusFilter::parse(params.status.as_deref()) {
            Ok(status) => status,
            Err(e) => {
                errors.add("status", e.get("status").join(", "));
                StatusFilter::All
            }
        };
        let company_id = normalize(params.company_id.clone())
            .filter(|raw| raw != "all")
            .and_then(|raw| parse_uuid(&mut errors, "company_id", &raw));
        let influencer_id = normalize(params.influencer_id.clone())
            .filter(|raw| raw != "all")
            .and_then(|raw| parse_uuid(&mut errors, "influencer_id", &raw));

        errors.finish(Self {
            search: normalize(params.search.clone()),
            status,
            company_id,
            influencer_id,
        })
    }
}

/// Translates listing filters into a `Filter` on the collaboration view
pub struct CollaborationQuery;

impl CollaborationQuery {
    /// Sort defaults to `created_at desc`; a column outside the whitelist is rejected
    pub fn sort(field: Option<&str>, direction: Option<&str>) -> Result<FilterOrderInfo, FilterError> {
        let field = field.map(str::trim).filter(|f| !f.is_empty()).unwrap_or("created_at");
        let direction = direction.map(SortDirection::parse).unwrap_or(SortDirection::Desc);
        let mut order = FilterOrder::validate_and_parse(field, direction, SORTABLE_COLUMNS)?;
        if order.column == "deadline" {
            order.nulls = Some(crate::filter::NullsOrder::Last);
        }
        Ok(order)
    }

    /// Conditions only, shared by the page query and its count
    pub fn conditions(
        filters: &CollaborationFilters,
        now: DateTime<Utc>,
        organization_id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> Result<Filter, FilterError> {
        let mut filter = Filter::new(COLLABORATION_VIEW)?;
        filter.where_clause(Condition::eq("organization_id", organization_id));

        if let Some(profile_id) = assigned_to {
            filter.where_clause(Condition::eq("assigned_influencer_id", profile_id));
        }

        if let Some(term) = filters.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            filter.where_clause(Condition::contains("title", term));
        }

        match filters.status {
            StatusFilter::All => {}
            StatusFilter::Overdue => {
                filter
                    .where_clause(Condition::lt("deadline", now))
                    .where_clause(Condition::not_in(
                        "status",
                        CollaborationStatus::closed().iter().map(|s| s.as_str()),
                    ));
            }
            StatusFilter::Is(status) => {
                filter.where_clause(Condition::eq("status", status.as_str()));
            }
        }

        if let Some(company_id) = filters.company_id {
            filter.where_clause(Condition::eq("company_id", company_id));
        }
        if let Some(influencer_id) = filters.influencer_id {
            filter.where_clause(Condition::eq("assigned_influencer_id", influencer_id));
        }

        Ok(filter)
    }

    pub fn build(
        filters: &CollaborationFilters,
        page: PageRequest,
        sort: FilterOrderInfo,
        now: DateTime<Utc>,
        organization_id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> Result<Filter, FilterError> {
        let mut filter = Self::conditions(filters, now, organization_id, assigned_to)?;
        filter.order(sort);
        filter.limit(page.limit(), Some(page.offset()))?;
        Ok(filter)
    }
}

/// Pick lists for the collaboration form
#[derive(Debug, Clone, Serialize)]
pub struct CollaborationOptions {
    pub companies: Vec<CompanyRef>,
    pub influencers: Vec<InfluencerRef>,
}

pub struct CollaborationService {
    pool: PgPool,
    profile: CurrentProfile,
}

impl CollaborationService {
    pub fn new(pool: PgPool, profile: CurrentProfile) -> Self {
        Self { pool, profile }
    }

    fn view(&self) -> Repository<CollaborationDetailsRow> {
        Repository::new(COLLABORATION_VIEW, self.profile.organization_id, self.pool.clone())
    }

    pub async fn list(&self, params: CollaborationListParams) -> Result<Page<CollaborationWithRelations>, ApiError> {
        let access = self.profile.require(Resource::Collaboration, Operation::Select)?;
        let filters = CollaborationFilters::from_params(&params)?;
        let api = &config::config().api;
        let page = PageRequest::resolve(params.page, params.limit, api.collaboration_page_size, api.max_page_size);
        let sort = CollaborationQuery::sort(params.sort.as_deref(), params.order.as_deref())?;
        let now = Utc::now();
        let scope = self.profile.assigned_scope(access);

        let repo = self.view();
        let count_filter = CollaborationQuery::conditions(&filters, now, self.profile.organization_id, scope)?;
        let total = repo.count(count_filter).await?;

        let page_filter = CollaborationQuery::build(&filters, page, sort, now, self.profile.organization_id, scope)?;
        let rows = repo.select_any(page_filter).await?;

        tracing::debug!(
            "Listed {} of {} collaborations for organization {}",
            rows.len(),
            total,
            self.profile.organization_id
        );

        Ok(Page {
            items: rows.into_iter().map(|row| CollaborationWithRelations::from_row(row, now)).collect(),
            pagination: Pagination::new(page, total),
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<CollaborationWithRelations, ApiError> {
        let access = self.profile.require(Resource::Collaboration, Operation::Select)?;
        let row = self.find_visible(id, self.profile.assigned_scope(access)).await?;
        Ok(CollaborationWithRelations::from_row(row, Utc::now()))
    }

    pub async fn create(&self, input: CollaborationInput) -> Result<CollaborationWithRelations, ApiError> {
        self.profile.require(Resource::Collaboration, Operation::Create)?;
        self.check_company(input.company_id).await?;
        if let Some(influencer_id) = input.assigned_influencer_id {
            self.check_influencer(influencer_id).await?;
        }

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO collaborations
                (organization_id, title, company_id, assigned_influencer_id, status, deadline, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(self.profile.organization_id)
        .bind(&input.title)
        .bind(input.company_id)
        .bind(input.assigned_influencer_id)
        .bind(input.status.as_str())
        .bind(input.deadline)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Referenced company or influencer no longer exists"))?;

        tracing::info!("Created collaboration {} in organization {}", id, self.profile.organization_id);
        self.reload(id).await
    }

    pub async fn update(&self, id: Uuid, changes: CollaborationChanges) -> Result<CollaborationWithRelations, ApiError> {
        self.profile.require(Resource::Collaboration, Operation::Update)?;
        self.find_visible(id, None).await?;

        if let Some(company_id) = changes.company_id {
            self.check_company(company_id).await?;
        }
        if let Some(Some(influencer_id)) = changes.assigned_influencer_id {
            self.check_influencer(influencer_id).await?;
        }

        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE collaborations SET updated_at = now()");
        if let Some(title) = changes.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(company_id) = changes.company_id {
            qb.push(", company_id = ").push_bind(company_id);
        }
        if let Some(influencer_id) = changes.assigned_influencer_id {
            qb.push(", assigned_influencer_id = ").push_bind(influencer_id);
        }
        if let Some(status) = changes.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(deadline) = changes.deadline {
            qb.push(", deadline = ").push_bind(deadline);
        }
        if let Some(notes) = changes.notes {
            qb.push(", notes = ").push_bind(notes);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND organization_id = ")
            .push_bind(self.profile.organization_id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Referenced company or influencer no longer exists"))?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Collaboration not found"));
        }

        tracing::info!("Updated collaboration {}", id);
        self.reload(id).await
    }

    /// Admins may change any status; influencers only on collaborations assigned to them
    pub async fn update_status(&self, id: Uuid, status: CollaborationStatus) -> Result<CollaborationWithRelations, ApiError> {
        let access = self.profile.require(Resource::Collaboration, Operation::UpdateStatus)?;
        self.find_visible(id, self.profile.assigned_scope(access)).await?;

        sqlx::query("UPDATE collaborations SET status = $1, updated_at = now() WHERE id = $2 AND organization_id = $3")
            .bind(status.as_str())
            .bind(id)
            .bind(self.profile.organization_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Sqlx)?;

        tracing::info!("Collaboration {} moved to {} by profile {}", id, status, self.profile.id);
        self.reload(id).await
    }

    /// Deleting a collaboration removes its briefing through the foreign key cascade
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.profile.require(Resource::Collaboration, Operation::Delete)?;

        let result = sqlx::query("DELETE FROM collaborations WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(self.profile.organization_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Collaboration not found"));
        }

        tracing::info!("Deleted collaboration {}", id);
        Ok(())
    }

    pub async fn options(&self) -> Result<CollaborationOptions, ApiError> {
        self.profile.require(Resource::FormOptions, Operation::Select)?;
        let limit = i64::from(config::config().api.options_limit);
        let org = self.profile.organization_id;

        let companies_repo: Repository<CompanyRef> = Repository::new("companies", org, self.pool.clone());
        let mut companies_filter = companies_repo.filter()?;
        companies_filter
            .order(FilterOrderInfo { column: "name".into(), sort: SortDirection::Asc, nulls: None })
            .limit(limit, None)?;

        let influencers_repo: Repository<InfluencerRef> = Repository::new("user_profiles", org, self.pool.clone());
        let mut influencers_filter = influencers_repo.filter()?;
        influencers_filter
            .where_clause(Condition::eq("role", "influencer"))
            .order(FilterOrderInfo { column: "full_name".into(), sort: SortDirection::Asc, nulls: None })
            .limit(limit, None)?;

        Ok(CollaborationOptions {
            companies: companies_repo.select_any(companies_filter).await?,
            influencers: influencers_repo.select_any(influencers_filter).await?,
        })
    }

    /// Loads a collaboration of the caller's organization, optionally restricted to one influencer
    pub(crate) async fn find_visible(
        &self,
        id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> Result<CollaborationDetailsRow, ApiError> {
        let repo = self.view();
        let mut filter = repo.by_id(id)?;
        if let Some(profile_id) = assigned_to {
            filter.where_clause(Condition::eq("assigned_influencer_id", profile_id));
        }
        Ok(repo.select_404(filter, "Collaboration not found").await?)
    }

    async fn reload(&self, id: Uuid) -> Result<CollaborationWithRelations, ApiError> {
        let row = self.find_visible(id, None).await?;
        Ok(CollaborationWithRelations::from_row(row, Utc::now()))
    }

    async fn check_company(&self, company_id: Uuid) -> Result<(), ApiError> {
        let companies: Repository<Company> =
            Repository::new("companies", self.profile.organization_id, self.pool.clone());
        if !companies.exists(company_id).await? {
            return Err(ApiError::field_error("company_id", "Company not found"));
        }
        Ok(())
    }

    async fn check_influencer(&self, profile_id: Uuid) -> Result<(), ApiError> {
        let profiles: Repository<InfluencerRef> =
            Repository::new("user_profiles", self.profile.organization_id, self.pool.clone());
        let mut filter = profiles.by_id(profile_id)?;
        filter.where_clause(Condition::eq("role", "influencer"));
        if profiles.count(filter).await? == 0 {
            return Err(ApiError::field_error("assigned_influencer_id", "Influencer not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SqlParam;

    fn org() -> Uuid {
        Uuid::parse_str("00000000-0000-0000-0000-0000000000aa").unwrap()
    }

    #[test]
    fn parses_status_filter() {
        assert_eq!(StatusFilter::parse(None).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("all")).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("overdue")).unwrap(), StatusFilter::Overdue);
        assert_eq!(
            StatusFilter::parse(Some("in_progress")).unwrap(),
            StatusFilter::Is(CollaborationStatus::InProgress)
        );
        assert!(StatusFilter::parse(Some("archived")).is_err());
    }

    #[test]
    fn filters_reject_bad_ids() {
        let params = CollaborationListParams { company_id: Some("acme".into()), ..Default::default() };
        let errors = CollaborationFilters::from_params(&params).unwrap_err();
        assert!(errors.has("company_id"));
    }

    #[test]
    fn filters_treat_all_as_unset() {
        let params = CollaborationListParams {
            search: Some("  ".into()),
            company_id: Some("all".into()),
            influencer_id: Some("".into()),
            ..Default::default()
        };
        assert_eq!(CollaborationFilters::from_params(&params).unwrap(), CollaborationFilters::default());
    }

    #[test]
    fn default_query_is_org_scoped_and_newest_first() {
        let sort = CollaborationQuery::sort(None, None).unwrap();
        let page = PageRequest::resolve(None, None, 25, 100);
        let filter =
            CollaborationQuery::build(&CollaborationFilters::default(), page, sort, Utc::now(), org(), None).unwrap();

        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"collaboration_details\" WHERE \"organization_id\" = $1 ORDER BY \"created_at\" DESC LIMIT 25 OFFSET 0"
        );
        assert!(matches!(sql.params[0], SqlParam::Uuid(id) if id == org()));
    }

    #[test]
    fn overdue_excludes_closed_statuses() {
        let now = Utc::now();
        let filters = CollaborationFilters { status: StatusFilter::Overdue, ..Default::default() };
        let sql = CollaborationQuery::conditions(&filters, now, org(), None).unwrap().to_sql().unwrap();

        assert_eq!(
            sql.query,
            "SELECT * FROM \"collaboration_details\" WHERE \"organization_id\" = $1 AND \"deadline\" < $2 AND \"status\" NOT IN ($3, $4)"
        );
        assert!(matches!(sql.params[1], SqlParam::Timestamp(t) if t == now));
        assert!(matches!(&sql.params[2], SqlParam::Text(s) if s == "completed"));
        assert!(matches!(&sql.params[3], SqlParam::Text(s) if s == "declined"));
    }

    #[test]
    fn combines_search_status_company_and_influencer() {
        let company = Uuid::new_v4();
        let influencer = Uuid::new_v4();
        let filters = CollaborationFilters {
            search: Some("50%".into()),
            status: StatusFilter::Is(CollaborationStatus::Negotiating),
            company_id: Some(company),
            influencer_id: Some(influencer),
        };
        let sql = CollaborationQuery::conditions(&filters, Utc::now(), org(), None).unwrap().to_sql().unwrap();

        assert!(sql.query.contains("\"title\" ILIKE $2"));
        assert!(sql.query.contains("\"status\" = $3"));
        assert!(sql.query.contains("\"company_id\" = $4"));
        assert!(sql.query.contains("\"assigned_influencer_id\" = $5"));
        assert!(matches!(&sql.params[1], SqlParam::Text(s) if s == "%50\\%%"));
        assert!(matches!(&sql.params[2], SqlParam::Text(s) if s == "negotiating"));
    }

    #[test]
    fn influencer_scope_adds_assignment_condition() {
        let me = Uuid::new_v4();
        let sql = CollaborationQuery::conditions(&CollaborationFilters::default(), Utc::now(), org(), Some(me))
            .unwrap()
            .to_sql()
            .unwrap();
        assert!(sql.query.ends_with("\"organization_id\" = $1 AND \"assigned_influencer_id\" = $2"));
        assert!(matches!(sql.params[1], SqlParam::Uuid(id) if id == me));
    }

    #[test]
    fn sort_is_whitelisted() {
        let order = CollaborationQuery::sort(Some("title"), Some("asc")).unwrap();
        assert_eq!(order.column, "title");
        assert_eq!(order.sort, SortDirection::Asc);

        let deadline = CollaborationQuery::sort(Some("deadline"), None).unwrap();
        assert_eq!(deadline.nulls, Some(crate::filter::NullsOrder::Last));

        assert_eq!(
            CollaborationQuery::sort(Some("organization_id"), None).unwrap_err(),
            FilterError::InvalidColumn("organization_id".into())
        );
    }

    #[test]
    fn direction_param_sets_sort_order() {
        let params: CollaborationListParams =
            serde_json::from_value(serde_json::json!({ "sort": "title", "direction": "asc" })).unwrap();
        let order = CollaborationQuery::sort(params.sort.as_deref(), params.order.as_deref()).unwrap();
        assert_eq!(order.column, "title");
        assert_eq!(order.sort, SortDirection::Asc);

        let params: CollaborationListParams =
            serde_json::from_value(serde_json::json!({ "sortBy": "deadline", "sortOrder": "desc" })).unwrap();
        let order = CollaborationQuery::sort(params.sort.as_deref(), params.order.as_deref()).unwrap();
        assert_eq!(order.sort, SortDirection::Desc);
    }

    #[test]
    fn filter_order_parses_against_whitelist() {
        let order = FilterOrder::validate_and_parse("status", SortDirection::Asc, SORTABLE_COLUMNS).unwrap();
        assert_eq!(order.column, "status");
        assert!(FilterOrder::validate_and_parse("notes", SortDirection::Asc, SORTABLE_COLUMNS).is_err());
    }

    #[test]
    fn pages_translate_to_offsets() {
        let page = PageRequest::resolve(Some(3), Some(10), 25, 100);
        let sort = CollaborationQuery::sort(None, None).unwrap();
        let sql = CollaborationQuery::build(&CollaborationFilters::default(), page, sort, Utc::now(), org(), None)
            .unwrap()
            .to_sql()
            .unwrap();
        assert!(sql.query.ends_with("LIMIT 10 OFFSET 20"));
    }
}
