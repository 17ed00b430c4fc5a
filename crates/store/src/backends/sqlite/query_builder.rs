//! SQL generation for contract queries.
//!
//! Translates a [`ContractQuery`] into a WHERE clause and ORDER BY
//! expression executable against the `contracts` table. Clauses are built
//! as composable [`SqlFragment`]s; keyword unions are explicit OR'd clause
//! lists.

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value};
use rust_decimal::prelude::ToPrimitive;

use crate::query::{ContractQuery, KeywordSearch, QueryType, SortField, SortKey};

/// A fragment of SQL with its bound parameters, in positional order.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::String(s) => Ok(ToSqlOutput::Owned(Value::Text(s.clone()))),
            SqlParam::Integer(i) => Ok(ToSqlOutput::Owned(Value::Integer(*i))),
            SqlParam::Float(f) => Ok(ToSqlOutput::Owned(Value::Real(*f))),
        }
    }
}

impl SqlFragment {
    /// Creates a parameterless fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Combines with another fragment using AND.
    pub fn and(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) AND ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// Combines with another fragment using OR.
    pub fn or(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) OR ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// Returns true if this fragment carries no SQL.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// A case-insensitive substring clause against the labor category.
fn category_contains(token: &str) -> SqlFragment {
    SqlFragment::with_params(
        "labor_category COLLATE NOCASE LIKE '%' || ? || '%'",
        vec![SqlParam::String(token.to_string())],
    )
}

/// A case-insensitive exact clause against the labor category.
fn category_equals(token: &str) -> SqlFragment {
    SqlFragment::with_params(
        "labor_category = ? COLLATE NOCASE",
        vec![SqlParam::String(token.trim().to_string())],
    )
}

/// Builds the clause for a keyword search. Shared by the rates WHERE
/// builder and the autocomplete query.
pub(crate) fn keyword_clause(keyword: &KeywordSearch) -> SqlFragment {
    match keyword.query_type {
        // Multi-term search: every token must match. This is the store's
        // rendition of the relevance-search capability.
        QueryType::MatchAll => keyword
            .tokens
            .iter()
            .map(|t| category_contains(t))
            .fold(SqlFragment::default(), SqlFragment::and),
        // Union of substring clauses, one per token.
        QueryType::MatchPhrase => keyword
            .tokens
            .iter()
            .map(|t| category_contains(t))
            .fold(SqlFragment::default(), SqlFragment::or),
        // Union of exact clauses, one per trimmed token.
        QueryType::MatchExact => keyword
            .tokens
            .iter()
            .map(|t| category_equals(t))
            .fold(SqlFragment::default(), SqlFragment::or),
    }
}

/// Builds the WHERE clause for a query.
///
/// The null-price exclusion on the selected price field is unconditional
/// and always the first clause.
pub fn build_where(query: &ContractQuery) -> SqlFragment {
    let price_col = query.price_field.column();

    let mut fragment = SqlFragment::new(format!("{} IS NOT NULL", price_col));

    if !query.exclude_ids.is_empty() {
        let placeholders = vec!["?"; query.exclude_ids.len()].join(", ");
        fragment = fragment.and(SqlFragment::with_params(
            format!("id NOT IN ({})", placeholders),
            query
                .exclude_ids
                .iter()
                .map(|id| SqlParam::Integer(*id))
                .collect(),
        ));
    }

    if let Some(keyword) = &query.keyword {
        fragment = fragment.and(keyword_clause(keyword));
    }

    if let Some(min) = query.min_experience {
        fragment = fragment.and(SqlFragment::with_params(
            "min_years_experience >= ?",
            vec![SqlParam::Integer(min)],
        ));
    }

    if let Some(max) = query.max_experience {
        fragment = fragment.and(SqlFragment::with_params(
            "min_years_experience <= ?",
            vec![SqlParam::Integer(max)],
        ));
    }

    if let Some(floor) = query.min_education {
        fragment = fragment.and(SqlFragment::with_params(
            "education_level >= ?",
            vec![SqlParam::Integer(floor.rank())],
        ));
    }

    if let Some(levels) = &query.education_levels {
        if levels.is_empty() {
            // An education set that intersects to nothing matches nothing.
            fragment = fragment.and(SqlFragment::new("1 = 0"));
        } else {
            let placeholders = vec!["?"; levels.len()].join(", ");
            fragment = fragment.and(SqlFragment::with_params(
                format!("education_level IN ({})", placeholders),
                levels.iter().map(|l| SqlParam::Integer(l.rank())).collect(),
            ));
        }
    }

    if let Some(sin) = &query.sin {
        fragment = fragment.and(SqlFragment::with_params(
            "sin COLLATE NOCASE LIKE '%' || ? || '%'",
            vec![SqlParam::String(sin.clone())],
        ));
    }

    if let Some(schedule) = &query.schedule {
        fragment = fragment.and(SqlFragment::with_params(
            "schedule = ? COLLATE NOCASE",
            vec![SqlParam::String(schedule.clone())],
        ));
    }

    if let Some(site) = &query.site {
        fragment = fragment.and(SqlFragment::with_params(
            "contractor_site COLLATE NOCASE LIKE '%' || ? || '%'",
            vec![SqlParam::String(site.clone())],
        ));
    }

    if let Some(size) = query.business_size {
        fragment = fragment.and(SqlFragment::with_params(
            "business_size COLLATE NOCASE LIKE ? || '%'",
            vec![SqlParam::String(size.prefix().to_string())],
        ));
    }

    // Exact price wins outright; the bound parameters are not applied.
    if let Some(price) = query.exact_price {
        fragment = fragment.and(SqlFragment::with_params(
            format!("{} = ?", price_col),
            vec![SqlParam::Float(price.to_f64().unwrap_or(f64::NAN))],
        ));
    } else {
        if let Some(floor) = query.price_floor {
            fragment = fragment.and(SqlFragment::with_params(
                format!("{} >= ?", price_col),
                vec![SqlParam::Float(floor.to_f64().unwrap_or(f64::NAN))],
            ));
        }
        if let Some(ceiling) = query.price_ceiling {
            fragment = fragment.and(SqlFragment::with_params(
                format!("{} <= ?", price_col),
                vec![SqlParam::Float(ceiling.to_f64().unwrap_or(f64::NAN))],
            ));
        }
    }

    fragment
}

/// Builds the ORDER BY expression for a query.
///
/// A final `id ASC` key keeps pagination stable when sort values tie.
pub fn build_order_by(sort: &[SortKey]) -> String {
    let mut terms: Vec<String> = sort
        .iter()
        .map(|key| {
            format!(
                "{} {}",
                key.field.column(),
                if key.descending { "DESC" } else { "ASC" }
            )
        })
        .collect();

    if !sort.iter().any(|key| key.field == SortField::Id) {
        terms.push("id ASC".to_string());
    }

    format!("ORDER BY {}", terms.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EducationLevel, PriceField};
    use crate::query::{BusinessSizeCode, KeywordSearch};
    use rust_decimal::Decimal;

    #[test]
    fn fragment_and_or_combinators() {
        let a = SqlFragment::new("x = 1");
        let b = SqlFragment::with_params("y = ?", vec![SqlParam::Integer(2)]);
        let combined = a.and(b);
        assert_eq!(combined.sql, "(x = 1) AND (y = ?)");
        assert_eq!(combined.params.len(), 1);

        let empty = SqlFragment::default().or(SqlFragment::new("z = 3"));
        assert_eq!(empty.sql, "z = 3");
    }

    #[test]
    fn null_price_exclusion_is_always_first() {
        let query = ContractQuery::new(PriceField::NextYear);
        let fragment = build_where(&query);
        assert_eq!(fragment.sql, "next_year_price IS NOT NULL");
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn null_price_exclusion_is_idempotent() {
        // Re-applying the exclusion clause narrows nothing further: the
        // WHERE text for the same query never changes between builds.
        let query = ContractQuery::new(PriceField::Current);
        let first = build_where(&query);
        let second = build_where(&query);
        assert_eq!(first.sql, second.sql);
        assert_eq!(
            first.sql.matches("current_price IS NOT NULL").count(),
            1
        );
    }

    #[test]
    fn match_phrase_builds_or_union() {
        let mut query = ContractQuery::new(PriceField::Current);
        query.keyword = Some(KeywordSearch {
            tokens: vec!["engineer".to_string(), "analyst".to_string()],
            query_type: QueryType::MatchPhrase,
        });
        let fragment = build_where(&query);
        assert!(fragment.sql.contains(") OR ("));
        assert_eq!(fragment.params.len(), 2);
    }

    #[test]
    fn match_all_builds_and_chain() {
        let mut query = ContractQuery::new(PriceField::Current);
        query.keyword = Some(KeywordSearch {
            tokens: vec!["senior".to_string(), "engineer".to_string()],
            query_type: QueryType::MatchAll,
        });
        let fragment = build_where(&query);
        assert!(!fragment.sql.contains(") OR ("));
        assert_eq!(fragment.sql.matches("LIKE").count(), 2);
    }

    #[test]
    fn match_exact_uses_equality() {
        let mut query = ContractQuery::new(PriceField::Current);
        query.keyword = Some(KeywordSearch {
            tokens: vec![" Engineer ".to_string()],
            query_type: QueryType::MatchExact,
        });
        let fragment = build_where(&query);
        assert!(fragment.sql.contains("labor_category = ? COLLATE NOCASE"));
        // Token is trimmed before binding.
        match &fragment.params[0] {
            SqlParam::String(s) => assert_eq!(s, "Engineer"),
            other => panic!("unexpected param {:?}", other),
        }
    }

    #[test]
    fn exact_price_skips_bounds() {
        let mut query = ContractQuery::new(PriceField::Current);
        query.exact_price = Some(Decimal::new(2500, 2));
        query.price_floor = Some(Decimal::new(1000, 2));
        query.price_ceiling = Some(Decimal::new(9000, 2));
        let fragment = build_where(&query);
        assert!(fragment.sql.contains("current_price = ?"));
        assert!(!fragment.sql.contains("current_price >= ?"));
        assert!(!fragment.sql.contains("current_price <= ?"));

        // Same query without the exact price applies both bounds.
        query.exact_price = None;
        let fragment = build_where(&query);
        assert!(fragment.sql.contains("current_price >= ?"));
        assert!(fragment.sql.contains("current_price <= ?"));
    }

    #[test]
    fn education_floor_filters_by_rank() {
        let mut query = ContractQuery::new(PriceField::Current);
        query.min_education = Some(EducationLevel::Bachelors);
        let fragment = build_where(&query);
        assert!(fragment.sql.contains("education_level >= ?"));
        match fragment.params.last() {
            Some(SqlParam::Integer(rank)) => assert_eq!(*rank, 2),
            other => panic!("unexpected param {:?}", other),
        }
    }

    #[test]
    fn empty_education_set_matches_nothing() {
        let mut query = ContractQuery::new(PriceField::Current);
        query.education_levels = Some(Vec::new());
        let fragment = build_where(&query);
        assert!(fragment.sql.contains("1 = 0"));
    }

    #[test]
    fn business_size_is_prefix_match() {
        let mut query = ContractQuery::new(PriceField::Current);
        query.business_size = Some(BusinessSizeCode::Small);
        let fragment = build_where(&query);
        assert!(
            fragment
                .sql
                .contains("business_size COLLATE NOCASE LIKE ? || '%'")
        );
    }

    #[test]
    fn order_by_appends_stable_id_key() {
        let query = ContractQuery::new(PriceField::Current);
        assert_eq!(
            build_order_by(&query.sort),
            "ORDER BY current_price ASC, id ASC"
        );

        let descending = vec![SortKey {
            field: SortField::VendorName,
            descending: true,
        }];
        assert_eq!(
            build_order_by(&descending),
            "ORDER BY vendor_name DESC, id ASC"
        );

        let by_id = vec![SortKey {
            field: SortField::Id,
            descending: false,
        }];
        assert_eq!(build_order_by(&by_id), "ORDER BY id ASC");
    }
}
