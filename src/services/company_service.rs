use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::{Page, PageRequest, Pagination};
use crate::config;
use crate::database::models::{Company, CompanyOverview, CompanyWithContacts, Contact};
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::{Condition, FilterOrderInfo, SortDirection};
use crate::middleware::CurrentProfile;
use crate::types::{Operation, Resource};
use crate::validation::{normalize, CompanyInput};

const COMPANY_COLUMNS: &str = "id, organization_id, name, industry, website, notes, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyListParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub struct CompanyService {
    pool: PgPool,
    profile: CurrentProfile,
}

impl CompanyService {
    pub fn new(pool: PgPool, profile: CurrentProfile) -> Self {
        Self { pool, profile }
    }

    fn companies(&self) -> Repository<Company> {
        Repository::new("companies", self.profile.organization_id, self.pool.clone())
    }

    /// Name or industry search, alphabetical, with contact counts
    pub async fn list(&self, params: CompanyListParams) -> Result<Page<CompanyOverview>, ApiError> {
        self.profile.require(Resource::Company, Operation::Select)?;
        let api = &config::config().api;
        let page = PageRequest::resolve(params.page, params.limit, api.company_page_size, api.max_page_size);

        let repo: Repository<CompanyOverview> =
            Repository::new("company_overview", self.profile.organization_id, self.pool.clone());
        let search = normalize(params.search).map(|term| {
            Condition::Or(vec![Condition::contains("name", &term), Condition::contains("industry", &term)])
        });

        let mut count_filter = repo.filter()?;
        let mut filter = repo.filter()?;
        if let Some(condition) = search {
            count_filter.where_clause(condition.clone());
            filter.where_clause(condition);
        }
        let total = repo.count(count_filter).await?;

        filter
            .order(FilterOrderInfo { column: "name".into(), sort: SortDirection::Asc, nulls: None })
            .limit(page.limit(), Some(page.offset()))?;
        let items = repo.select_any(filter).await?;

        Ok(Page { items, pagination: Pagination::new(page, total) })
    }

    pub async fn get(&self, id: Uuid) -> Result<CompanyWithContacts, ApiError> {
        self.profile.require(Resource::Company, Operation::Select)?;
        let repo = self.companies();
        let company = repo.select_404(repo.by_id(id)?, "Company not found").await?;

        let contacts_repo: Repository<Contact> =
            Repository::new("contacts", self.profile.organization_id, self.pool.clone());
        let mut contacts_filter = contacts_repo.filter()?;
        contacts_filter
            .where_clause(Condition::eq("company_id", id))
            .order(FilterOrderInfo { column: "name".into(), sort: SortDirection::Asc, nulls: None });
        let contacts = contacts_repo.select_any(contacts_filter).await?;

        Ok(CompanyWithContacts { company, contacts })
    }

    /// Returns the company plus a warning when another company of the organization has the same name
    pub async fn create(&self, input: CompanyInput) -> Result<(Company, Option<String>), ApiError> {
        self.profile.require(Resource::Company, Operation::Create)?;
        let warning = self.duplicate_name_warning(&input.name, None).await?;

        let company = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies (organization_id, name, industry, website, notes) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COMPANY_COLUMNS
        ))
        .bind(self.profile.organization_id)
        .bind(&input.name)
        .bind(&input.industry)
        .bind(&input.website)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

        tracing::info!("Created company {} ({}) in organization {}", company.id, company.name, company.organization_id);
        Ok((company, warning))
    }

    /// Replaces all form fields
    pub async fn update(&self, id: Uuid, input: CompanyInput) -> Result<(Company, Option<String>), ApiError> {
        self.profile.require(Resource::Company, Operation::Update)?;
        let warning = self.duplicate_name_warning(&input.name, Some(id)).await?;

        let company = sqlx::query_as::<_, Company>(&format!(
            "UPDATE companies SET name = $1, industry = $2, website = $3, notes = $4, updated_at = now() \
             WHERE id = $5 AND organization_id = $6 RETURNING {}",
            COMPANY_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.industry)
        .bind(&input.website)
        .bind(&input.notes)
        .bind(id)
        .bind(self.profile.organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Sqlx)?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

        tracing::info!("Updated company {}", id);
        Ok((company, warning))
    }

    /// Contacts go with the company; collaborations still referencing it block the delete
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.profile.require(Resource::Company, Operation::Delete)?;

        let result = sqlx::query("DELETE FROM companies WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(self.profile.organization_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Company still has collaborations and cannot be deleted"))?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Company not found"));
        }

        tracing::info!("Deleted company {}", id);
        Ok(())
    }

    async fn duplicate_name_warning(&self, name: &str, exclude: Option<Uuid>) -> Result<Option<String>, ApiError> {
        let repo = self.companies();
        let mut filter = repo.filter()?;
        filter.where_clause(Condition::equals_ignore_case("name", name));
        if let Some(id) = exclude {
            filter.where_clause(Condition::ne("id", id));
        }
        if repo.count(filter).await? > 0 {
            return Ok(Some(format!("A company named '{}' already exists", name)));
        }
        Ok(None)
    }
}
