//! Filter compiler: request parameters to a contract query.
//!
//! Translates the open-ended filter parameter set into a
//! [`ContractQuery`] value. Each parameter narrows the candidate set
//! independently; the steps below apply in a fixed order so that
//! overriding rules (`experience_range` over `min_experience`/`max_experience`,
//! exact `price` over the price bounds) are unambiguous.
//!
//! Nothing here touches the store. The resulting query is a plain value the
//! handler hands to the store's terminal operations.

use std::str::FromStr;

use rust_decimal::Decimal;

use calc_store::model::{EducationLevel, PriceField};
use calc_store::query::{BusinessSizeCode, ContractQuery, KeywordSearch, QueryType, SortKey};

use crate::error::{ApiError, ApiResult};
use crate::extractors::params::ParamBag;
use crate::extractors::tokens::parse_delimited;

/// Compiles the filter parameters into a query over `price_field`.
///
/// Malformed numeric values and unknown sort or `min_education` codes are
/// client errors. Unknown codes inside the `education` set are silently
/// dropped; an unrecognized `business_size` or `query_type` imposes no
/// filter beyond the default.
pub fn compile(params: &ParamBag, price_field: PriceField) -> ApiResult<ContractQuery> {
    let mut query = ContractQuery::new(price_field);

    query.exclude_ids = parse_exclude(params)?;

    if let Some(q) = non_empty(params.first("q")) {
        let tokens = parse_delimited(q, ',');
        if !tokens.is_empty() {
            query.keyword = Some(KeywordSearch {
                tokens,
                query_type: QueryType::from_param(params.first("query_type")),
            });
        }
    }

    let (min_experience, max_experience) = parse_experience(params)?;
    query.min_experience = min_experience;
    query.max_experience = max_experience;

    if let Some(code) = non_empty(params.first("min_education")) {
        query.min_education = Some(EducationLevel::from_code(code).ok_or_else(|| {
            ApiError::bad_request(format!("unknown education level: '{}'", code))
        })?);
    }

    if let Some(codes) = non_empty(params.first("education")) {
        // Unknown codes drop out; a fully-unknown list still filters and
        // matches nothing.
        let levels = parse_delimited(codes, ',')
            .iter()
            .filter_map(|code| EducationLevel::from_code(code))
            .collect();
        query.education_levels = Some(levels);
    }

    query.sin = non_empty(params.first("sin")).map(str::to_string);
    query.schedule = non_empty(params.first("schedule")).map(str::to_string);
    query.site = non_empty(params.first("site")).map(str::to_string);
    query.business_size = BusinessSizeCode::from_param(params.first("business_size"));

    if let Some(raw) = non_empty(params.first("price")) {
        // Exact price wins; the bound parameters are not even parsed.
        query.exact_price = Some(parse_price("price", raw)?);
    } else {
        if let Some(raw) = non_empty(params.first("price__gte")) {
            query.price_floor = Some(parse_price("price__gte", raw)?);
        }
        if let Some(raw) = non_empty(params.first("price__lte")) {
            query.price_ceiling = Some(parse_price("price__lte", raw)?);
        }
    }

    if let Some(sort) = non_empty(params.first("sort")) {
        let keys = parse_delimited(sort, ',')
            .iter()
            .map(|term| SortKey::parse(term))
            .collect::<Result<Vec<_>, _>>()?;
        if !keys.is_empty() {
            query.sort = keys;
        }
    }

    Ok(query)
}

/// Normalizes the `exclude` parameter: repeated keys and comma-joined
/// values both work, and may be mixed.
fn parse_exclude(params: &ParamBag) -> ApiResult<Vec<i64>> {
    let mut ids = Vec::new();
    for value in params.all("exclude") {
        for token in parse_delimited(value, ',') {
            let id = token
                .parse::<i64>()
                .map_err(|_| ApiError::invalid_number("exclude", &token))?;
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Resolves the experience bounds.
///
/// `experience_range=min[,max]` overrides the individual parameters. A
/// minimum of zero imposes no bound (every record already satisfies it and
/// the original API ignored it); a maximum applies whenever present, zero
/// included.
fn parse_experience(params: &ParamBag) -> ApiResult<(Option<i64>, Option<i64>)> {
    let mut min = parse_int_param(params, "min_experience")?;
    let mut max = parse_int_param(params, "max_experience")?;

    if let Some(range) = non_empty(params.first("experience_range")) {
        let parts = parse_delimited(range, ',');
        if let Some(first) = parts.first() {
            min = Some(parse_int("experience_range", first)?);
        }
        if let Some(second) = parts.get(1) {
            max = Some(parse_int("experience_range", second)?);
        }
    }

    if min == Some(0) {
        min = None;
    }
    Ok((min, max))
}

fn parse_int_param(params: &ParamBag, name: &str) -> ApiResult<Option<i64>> {
    match non_empty(params.first(name)) {
        Some(raw) => Ok(Some(parse_int(name, raw)?)),
        None => Ok(None),
    }
}

fn parse_int(param: &str, raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::invalid_number(param, raw))
}

fn parse_price(param: &str, raw: &str) -> ApiResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|_| ApiError::invalid_number(param, raw))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
