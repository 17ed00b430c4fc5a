//! Deferred query description for contract searches.
//!
//! A [`ContractQuery`] is a plain value describing a filtered, sorted view
//! of the contract table. The REST layer's filter compiler builds it from
//! request parameters; nothing executes until a [`crate::core::RateStore`]
//! terminal operation is invoked.

use rust_decimal::Decimal;

use crate::error::QueryError;
use crate::model::{EducationLevel, PriceField};

/// How a keyword search interprets its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    /// Multi-term relevance search: every token must match.
    #[default]
    MatchAll,
    /// Union of case-insensitive substring matches, one clause per token.
    MatchPhrase,
    /// Union of case-insensitive exact matches, one clause per token.
    MatchExact,
}

impl QueryType {
    /// Parses the `query_type` parameter; anything unrecognized (including
    /// absence) is a `match_all` search.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("match_phrase") => QueryType::MatchPhrase,
            Some("match_exact") => QueryType::MatchExact,
            _ => QueryType::MatchAll,
        }
    }
}

/// A tokenized keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSearch {
    /// Parsed search tokens, in input order.
    pub tokens: Vec<String>,
    /// Dispatch mode.
    pub query_type: QueryType,
}

/// The columns a client may sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    IdvPiid,
    VendorName,
    LaborCategory,
    Schedule,
    Sin,
    ContractorSite,
    BusinessSize,
    EducationLevel,
    MinYearsExperience,
    CurrentPrice,
    NextYearPrice,
    SecondYearPrice,
    ContractStart,
    ContractEnd,
}

impl SortField {
    /// The SQL column backing this sort field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::IdvPiid => "idv_piid",
            SortField::VendorName => "vendor_name",
            SortField::LaborCategory => "labor_category",
            SortField::Schedule => "schedule",
            SortField::Sin => "sin",
            SortField::ContractorSite => "contractor_site",
            SortField::BusinessSize => "business_size",
            SortField::EducationLevel => "education_level",
            SortField::MinYearsExperience => "min_years_experience",
            SortField::CurrentPrice => "current_price",
            SortField::NextYearPrice => "next_year_price",
            SortField::SecondYearPrice => "second_year_price",
            SortField::ContractStart => "contract_start",
            SortField::ContractEnd => "contract_end",
        }
    }

    /// Parses an API field name; unknown names are a client error, never
    /// silently dropped.
    pub fn parse(name: &str) -> Result<Self, QueryError> {
        let field = match name {
            "id" => SortField::Id,
            "idv_piid" => SortField::IdvPiid,
            "vendor_name" => SortField::VendorName,
            "labor_category" => SortField::LaborCategory,
            "schedule" => SortField::Schedule,
            "sin" => SortField::Sin,
            "contractor_site" => SortField::ContractorSite,
            "business_size" => SortField::BusinessSize,
            "education_level" => SortField::EducationLevel,
            "min_years_experience" => SortField::MinYearsExperience,
            "current_price" => SortField::CurrentPrice,
            "next_year_price" => SortField::NextYearPrice,
            "second_year_price" => SortField::SecondYearPrice,
            "contract_start" => SortField::ContractStart,
            "contract_end" => SortField::ContractEnd,
            other => {
                return Err(QueryError::UnknownSortField {
                    name: other.to_string(),
                });
            }
        };
        Ok(field)
    }

    /// The sort field backing a price field.
    pub fn for_price_field(field: PriceField) -> Self {
        match field {
            PriceField::Current => SortField::CurrentPrice,
            PriceField::NextYear => SortField::NextYearPrice,
            PriceField::SecondYear => SortField::SecondYearPrice,
        }
    }
}

/// One sort key, with direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// The field to sort by.
    pub field: SortField,
    /// True for descending order.
    pub descending: bool,
}

impl SortKey {
    /// Parses one sort term; a `-` prefix selects descending order.
    pub fn parse(term: &str) -> Result<Self, QueryError> {
        let term = term.trim();
        if let Some(name) = term.strip_prefix('-') {
            Ok(SortKey {
                field: SortField::parse(name)?,
                descending: true,
            })
        } else {
            Ok(SortKey {
                field: SortField::parse(term)?,
                descending: false,
            })
        }
    }
}

/// The business-size filter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessSizeCode {
    /// Matches values starting with "s" (case-insensitive).
    Small,
    /// Matches values starting with "o" (case-insensitive).
    OtherThanSmall,
}

impl BusinessSizeCode {
    /// The case-insensitive prefix the stored value must start with.
    pub fn prefix(&self) -> &'static str {
        match self {
            BusinessSizeCode::Small => "s",
            BusinessSizeCode::OtherThanSmall => "o",
        }
    }

    /// Parses the `business_size` parameter; any other value imposes no
    /// filter.
    pub fn from_param(value: Option<&str>) -> Option<Self> {
        match value {
            Some("s") => Some(BusinessSizeCode::Small),
            Some("o") => Some(BusinessSizeCode::OtherThanSmall),
            _ => None,
        }
    }

    /// The expanded phrase used by the CSV presenter.
    pub fn display_phrase(&self) -> &'static str {
        match self {
            BusinessSizeCode::Small => "small business",
            BusinessSizeCode::OtherThanSmall => "other than small",
        }
    }
}

/// A deferred, composable description of a filtered contract set.
///
/// Records whose selected price field is null are always excluded; that
/// step is unconditional and encoded by the SQL builder, not by a flag here.
#[derive(Debug, Clone)]
pub struct ContractQuery {
    /// The price column this query filters, aggregates, and sorts on.
    pub price_field: PriceField,
    /// Record ids removed from the candidate set.
    pub exclude_ids: Vec<i64>,
    /// Optional keyword search over the labor category.
    pub keyword: Option<KeywordSearch>,
    /// Inclusive lower bound on years of experience.
    pub min_experience: Option<i64>,
    /// Inclusive upper bound on years of experience.
    pub max_experience: Option<i64>,
    /// Education floor: keep levels ranked at or above this one.
    pub min_education: Option<EducationLevel>,
    /// Exact education set; `Some(vec![])` matches nothing.
    pub education_levels: Option<Vec<EducationLevel>>,
    /// Case-insensitive SIN substring.
    pub sin: Option<String>,
    /// Case-insensitive exact schedule code.
    pub schedule: Option<String>,
    /// Case-insensitive worksite substring.
    pub site: Option<String>,
    /// Business size prefix filter.
    pub business_size: Option<BusinessSizeCode>,
    /// Exact price; when set, the bound filters are not applied.
    pub exact_price: Option<Decimal>,
    /// Inclusive price lower bound.
    pub price_floor: Option<Decimal>,
    /// Inclusive price upper bound.
    pub price_ceiling: Option<Decimal>,
    /// Sort keys, in priority order.
    pub sort: Vec<SortKey>,
}

impl ContractQuery {
    /// Creates an unfiltered query over the given price field, sorted by
    /// that field ascending.
    pub fn new(price_field: PriceField) -> Self {
        ContractQuery {
            price_field,
            exclude_ids: Vec::new(),
            keyword: None,
            min_experience: None,
            max_experience: None,
            min_education: None,
            education_levels: None,
            sin: None,
            schedule: None,
            site: None,
            business_size: None,
            exact_price: None,
            price_floor: None,
            price_ceiling: None,
            sort: vec![SortKey {
                field: SortField::for_price_field(price_field),
                descending: false,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_type_defaults_to_match_all() {
        assert_eq!(QueryType::from_param(None), QueryType::MatchAll);
        assert_eq!(QueryType::from_param(Some("bogus")), QueryType::MatchAll);
        assert_eq!(
            QueryType::from_param(Some("match_phrase")),
            QueryType::MatchPhrase
        );
        assert_eq!(
            QueryType::from_param(Some("match_exact")),
            QueryType::MatchExact
        );
    }

    #[test]
    fn sort_key_parses_descending_prefix() {
        let key = SortKey::parse("-vendor_name").unwrap();
        assert_eq!(key.field, SortField::VendorName);
        assert!(key.descending);

        let key = SortKey::parse("current_price").unwrap();
        assert_eq!(key.field, SortField::CurrentPrice);
        assert!(!key.descending);
    }

    #[test]
    fn unknown_sort_field_is_an_error() {
        let err = SortKey::parse("no_such_column").unwrap_err();
        assert!(err.to_string().contains("unknown sort field"));
        // A descending prefix on an unknown field is still an error.
        assert!(SortKey::parse("-no_such_column").is_err());
    }

    #[test]
    fn business_size_codes() {
        assert_eq!(
            BusinessSizeCode::from_param(Some("s")),
            Some(BusinessSizeCode::Small)
        );
        assert_eq!(
            BusinessSizeCode::from_param(Some("o")),
            Some(BusinessSizeCode::OtherThanSmall)
        );
        assert_eq!(BusinessSizeCode::from_param(Some("x")), None);
        assert_eq!(BusinessSizeCode::from_param(None), None);
    }

    #[test]
    fn new_query_sorts_by_its_price_field() {
        let query = ContractQuery::new(PriceField::NextYear);
        assert_eq!(query.sort.len(), 1);
        assert_eq!(query.sort[0].field, SortField::NextYearPrice);
        assert!(!query.sort[0].descending);
    }
}
