use super::error::FilterError;
use super::types::{FilterOrderInfo, NullsOrder, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse a client-supplied sort field against the columns a listing allows sorting by
    pub fn validate_and_parse(
        field: &str,
        direction: SortDirection,
        allowed: &[&str],
    ) -> Result<FilterOrderInfo, FilterError> {
        let column = field.trim();
        if !allowed.contains(&column) {
            return Err(FilterError::InvalidColumn(column.to_string()));
        }
        Ok(FilterOrderInfo { column: column.to_string(), sort: direction, nulls: None })
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> Result<String, FilterError> {
        if infos.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(infos.len());
        for info in infos {
            if !super::filter::is_valid_identifier(&info.column) {
                return Err(FilterError::InvalidColumn(info.column.clone()));
            }
            let nulls = match info.nulls {
                Some(NullsOrder::First) => " NULLS FIRST",
                Some(NullsOrder::Last) => " NULLS LAST",
                None => "",
            };
            parts.push(format!("\"{}\" {}{}", info.column, info.sort.to_sql(), nulls));
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_columns_outside_whitelist() {
        let err = FilterOrder::validate_and_parse("organization_id", SortDirection::Asc, &["title"]).unwrap_err();
        assert_eq!(err, FilterError::InvalidColumn("organization_id".into()));
    }

    #[test]
    fn generates_nulls_last() {
        let sql = FilterOrder::generate(&[
            FilterOrderInfo { column: "deadline".into(), sort: SortDirection::Asc, nulls: Some(NullsOrder::Last) },
            FilterOrderInfo { column: "id".into(), sort: SortDirection::Desc, nulls: None },
        ])
        .unwrap();
        assert_eq!(sql, "ORDER BY \"deadline\" ASC NULLS LAST, \"id\" DESC");
    }
}
