use sqlx::{self, postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{Condition, Filter};

/// Typed reads over one table or view, confined to a single organization.
///
/// Every filter handed out by [`Repository::filter`] already carries the
/// `organization_id` condition, so callers cannot forget tenant scoping.
pub struct Repository<T> {
    table_name: String,
    organization_id: Uuid,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, organization_id: Uuid, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            organization_id,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Fresh organization-scoped filter for this table
    pub fn filter(&self) -> Result<Filter, DatabaseError> {
        let mut filter = Filter::new(&self.table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        filter.where_clause(Condition::eq("organization_id", self.organization_id));
        Ok(filter)
    }

    /// Scoped filter narrowed to one id
    pub fn by_id(&self, id: Uuid) -> Result<Filter, DatabaseError> {
        let mut filter = self.filter()?;
        filter.where_clause(Condition::eq("id", id));
        Ok(filter)
    }

    pub async fn select_any(&self, filter: Filter) -> Result<Vec<T>, DatabaseError> {
        self.check_table(&filter)?;
        QueryBuilder::<T>::new(filter).select_all(&self.pool).await
    }

    pub async fn select_one(&self, filter: Filter) -> Result<Option<T>, DatabaseError> {
        self.check_table(&filter)?;
        QueryBuilder::<T>::new(filter).select_optional(&self.pool).await
    }

    /// Like `select_one`, but a missing row becomes `DatabaseError::NotFound(message)`
    pub async fn select_404(&self, filter: Filter, message: &str) -> Result<T, DatabaseError> {
        self.select_one(filter)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(message.to_string()))
    }

    pub async fn count(&self, filter: Filter) -> Result<i64, DatabaseError> {
        self.check_table(&filter)?;
        QueryBuilder::<T>::new(filter).count(&self.pool).await
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.count(self.by_id(id)?).await? > 0)
    }

    fn check_table(&self, filter: &Filter) -> Result<(), DatabaseError> {
        if filter.table_name() != self.table_name {
            return Err(DatabaseError::QueryError(format!(
                "filter for '{}' used with repository for '{}'",
                filter.table_name(),
                self.table_name
            )));
        }
        Ok(())
    }
}
