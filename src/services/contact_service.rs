use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Company, Contact};
use crate::database::{DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::{Condition, FilterOrderInfo, SortDirection};
use crate::middleware::CurrentProfile;
use crate::types::{Operation, Resource};
use crate::validation::ContactInput;

const CONTACT_COLUMNS: &str = "id, organization_id, company_id, name, position, email, phone, created_at, updated_at";
const CONTACT_LIST_LIMIT: i64 = 100;

pub struct ContactService {
    pool: PgPool,
    profile: CurrentProfile,
}

impl ContactService {
    pub fn new(pool: PgPool, profile: CurrentProfile) -> Self {
        Self { pool, profile }
    }

    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Contact>, ApiError> {
        self.profile.require(Resource::Contact, Operation::Select)?;
        self.ensure_company(company_id).await?;

        let repo: Repository<Contact> = Repository::new("contacts", self.profile.organization_id, self.pool.clone());
        let mut filter = repo.filter()?;
        filter
            .where_clause(Condition::eq("company_id", company_id))
            .order(FilterOrderInfo { column: "name".into(), sort: SortDirection::Asc, nulls: None })
            .limit(CONTACT_LIST_LIMIT, None)?;

        Ok(repo.select_any(filter).await?)
    }

    pub async fn create(&self, company_id: Uuid, input: ContactInput) -> Result<Contact, ApiError> {
        self.profile.require(Resource::Contact, Operation::Create)?;
        self.ensure_company(company_id).await?;

        let contact = sqlx::query_as::<_, Contact>(&format!(
            "INSERT INTO contacts (organization_id, company_id, name, position, email, phone) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(self.profile.organization_id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.position)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Company no longer exists"))?;

        tracing::info!("Created contact {} for company {}", contact.id, company_id);
        Ok(contact)
    }

    pub async fn update(&self, id: Uuid, input: ContactInput) -> Result<Contact, ApiError> {
        self.profile.require(Resource::Contact, Operation::Update)?;

        let contact = sqlx::query_as::<_, Contact>(&format!(
            "UPDATE contacts SET name = $1, position = $2, email = $3, phone = $4, updated_at = now() \
             WHERE id = $5 AND organization_id = $6 RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.position)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(id)
        .bind(self.profile.organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Sqlx)?
        .ok_or_else(|| ApiError::not_found("Contact not found"))?;

        tracing::info!("Updated contact {}", id);
        Ok(contact)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.profile.require(Resource::Contact, Operation::Delete)?;

        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(self.profile.organization_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Contact not found"));
        }

        tracing::info!("Deleted contact {}", id);
        Ok(())
    }

    async fn ensure_company(&self, company_id: Uuid) -> Result<(), ApiError> {
        let companies: Repository<Company> =
            Repository::new("companies", self.profile.organization_id, self.pool.clone());
        if !companies.exists(company_id).await? {
            return Err(ApiError::not_found("Company not found"));
        }
        Ok(())
    }
}
