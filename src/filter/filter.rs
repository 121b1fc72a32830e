use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{Condition, FilterOrderInfo, SqlResult};

pub struct Filter {
    table_name: String,
    conditions: Vec<Condition>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        if !is_valid_identifier(&table_name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", table_name)));
        }
        Ok(Self {
            table_name,
            conditions: vec![],
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Adds a condition; all top-level conditions must hold
    pub fn where_clause(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    pub fn order(&mut self, order: FilterOrderInfo) -> &mut Self {
        self.order_data.push(order);
        self
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        if let Some(off) = offset {
            if off < 0 {
                return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
            }
        }

        // Hard cap; listings clamp client input earlier but internal callers go through here too
        let max_limit = i64::from(crate::config::CONFIG.api.options_limit.max(crate::config::CONFIG.api.max_page_size));
        let applied_limit = if limit > max_limit {
            tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            max_limit
        } else {
            limit
        };

        self.limit = Some(applied_limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0)?;
        let order_clause = FilterOrder::generate(&self.order_data)?;
        let limit_clause = self.build_limit_clause();

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", self.table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    /// Count with the same WHERE, ignoring order and pagination
    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0)?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table_name)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", self.table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}

/// Identifiers are interpolated into SQL, so only [A-Za-z_][A-Za-z0-9_]* passes
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}
