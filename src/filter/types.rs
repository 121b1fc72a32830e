use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A bind parameter with its Postgres type fixed at construction time
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Int(i64),
    Bool(bool),
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<Uuid> for SqlParam {
    fn from(v: Uuid) -> Self {
        SqlParam::Uuid(v)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    ILike,
}

impl FilterOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::ILike => "ILIKE",
        }
    }
}

/// WHERE tree. Top-level conditions of a `Filter` are joined with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: String,
        operator: FilterOp,
        value: SqlParam,
    },
    In {
        column: String,
        values: Vec<SqlParam>,
        negated: bool,
    },
    Null {
        column: String,
        negated: bool,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    fn compare(column: &str, operator: FilterOp, value: impl Into<SqlParam>) -> Self {
        Condition::Compare {
            column: column.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(column: &str, value: impl Into<SqlParam>) -> Self {
        Self::compare(column, FilterOp::Eq, value)
    }

    pub fn ne(column: &str, value: impl Into<SqlParam>) -> Self {
        Self::compare(column, FilterOp::Ne, value)
    }

    pub fn gt(column: &str, value: impl Into<SqlParam>) -> Self {
        Self::compare(column, FilterOp::Gt, value)
    }

    pub fn gte(column: &str, value: impl Into<SqlParam>) -> Self {
        Self::compare(column, FilterOp::Gte, value)
    }

    pub fn lt(column: &str, value: impl Into<SqlParam>) -> Self {
        Self::compare(column, FilterOp::Lt, value)
    }

    pub fn lte(column: &str, value: impl Into<SqlParam>) -> Self {
        Self::compare(column, FilterOp::Lte, value)
    }

    /// Case-insensitive substring match; LIKE wildcards in `term` match literally
    pub fn contains(column: &str, term: &str) -> Self {
        Self::compare(column, FilterOp::ILike, format!("%{}%", escape_like(term)))
    }

    /// Case-insensitive equality (ILIKE without wildcards)
    pub fn equals_ignore_case(column: &str, term: &str) -> Self {
        Self::compare(column, FilterOp::ILike, escape_like(term))
    }

    pub fn is_in<V: Into<SqlParam>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Condition::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    pub fn not_in<V: Into<SqlParam>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Condition::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    pub fn is_null(column: &str) -> Self {
        Condition::Null { column: column.to_string(), negated: false }
    }

    pub fn is_not_null(column: &str) -> Self {
        Condition::Null { column: column.to_string(), negated: true }
    }
}

/// Escape the LIKE metacharacters (backslash is the default escape in Postgres)
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Anything other than "asc" sorts descending
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
