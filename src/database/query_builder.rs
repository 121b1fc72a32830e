use std::time::Instant;

use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, SqlParam, SqlResult};

pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.sql_result()?;
        let started = Instant::now();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        warn_if_slow(&sql_result.query, started);
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.sql_result()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(pool).await?;
        Ok(row)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self
            .filter
            .to_count_sql()
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let started = Instant::now();
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        warn_if_slow(&sql_result.query, started);
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    fn sql_result(&self) -> Result<SqlResult, DatabaseError> {
        self.filter
            .to_sql()
            .map_err(|e| DatabaseError::QueryError(e.to_string()))
    }
}

fn warn_if_slow(query: &str, started: Instant) {
    let db = &crate::config::config().database;
    let elapsed = started.elapsed().as_millis() as u64;
    if db.enable_slow_query_warning && elapsed > db.slow_query_threshold_ms {
        tracing::warn!(elapsed_ms = elapsed, "Slow query: {}", query);
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Timestamp(t) => q.bind(*t),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Bool(b) => q.bind(*b),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Timestamp(t) => q.bind(*t),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Bool(b) => q.bind(*b),
    }
}
