use super::error::FilterError;
use super::filter::is_valid_identifier;
use super::types::{Condition, SqlParam};

/// Renders a condition tree into a WHERE fragment with numbered placeholders
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// AND-joins the top-level conditions. An empty list yields an empty clause.
    pub fn generate(conditions: &[Condition], starting_param_index: usize) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let parts = conditions
            .iter()
            .map(|c| filter_where.build(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((parts.join(" AND "), filter_where.param_values))
    }

    fn build(&mut self, condition: &Condition) -> Result<String, FilterError> {
        match condition {
            Condition::Compare { column, operator, value } => {
                let quoted = quote_column(column)?;
                let placeholder = self.param(value.clone());
                Ok(format!("{} {} {}", quoted, operator.to_sql(), placeholder))
            }
            Condition::In { column, values, negated } => {
                let quoted = quote_column(column)?;
                if values.is_empty() {
                    // x IN () matches nothing; x NOT IN () matches everything
                    return Ok(if *negated { "1=1".to_string() } else { "1=0".to_string() });
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                Ok(format!("{} {} ({})", quoted, keyword, params.join(", ")))
            }
            Condition::Null { column, negated } => {
                let quoted = quote_column(column)?;
                Ok(if *negated { format!("{} IS NOT NULL", quoted) } else { format!("{} IS NULL", quoted) })
            }
            Condition::And(children) => self.group(children, " AND ", "$and"),
            Condition::Or(children) => self.group(children, " OR ", "$or"),
        }
    }

    fn group(&mut self, children: &[Condition], joiner: &str, name: &str) -> Result<String, FilterError> {
        if children.is_empty() {
            return Err(FilterError::InvalidOperatorData(format!("{} requires at least one condition", name)));
        }
        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            parts.push(format!("({})", self.build(child)?));
        }
        Ok(format!("({})", parts.join(joiner)))
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

fn quote_column(column: &str) -> Result<String, FilterError> {
    if !is_valid_identifier(column) {
        return Err(FilterError::InvalidColumn(column.to_string()));
    }
    Ok(format!("\"{}\"", column))
}
