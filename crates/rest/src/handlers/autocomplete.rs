//! Labor category autocomplete handler.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use calc_store::RateStore;
use calc_store::model::LaborCategoryCount;
use calc_store::query::{KeywordSearch, QueryType};
use tracing::debug;

use crate::error::ApiResult;
use crate::extractors::params::ParamBag;
use crate::extractors::tokens::parse_delimited;
use crate::state::AppState;

/// Hard cap on autocomplete suggestions.
const MAX_RESULTS: usize = 20;

/// Handler for the labor category autocomplete endpoint.
///
/// # HTTP Request
///
/// `GET [base]/api/search/?q=<text>&query_type=<match_all|match_phrase>`
///
/// # Response
///
/// `200 OK` with a JSON array of `{ labor_category, count }`, grouped by
/// normalized labor category and ordered by count descending, at most 20
/// entries. An absent or empty `q` returns an empty array without touching
/// the store.
pub async fn autocomplete_handler<S>(
    State(state): State<AppState<S>>,
    params: ParamBag,
) -> ApiResult<Response>
where
    S: RateStore + 'static,
{
    let Some(q) = params.first("q").filter(|s| !s.is_empty()) else {
        return Ok(Json(Vec::<LaborCategoryCount>::new()).into_response());
    };

    // match_phrase searches for the query as a single substring; anything
    // else is a tokenized every-term search.
    let search = match params.first("query_type") {
        Some("match_phrase") => KeywordSearch {
            tokens: vec![q.to_string()],
            query_type: QueryType::MatchPhrase,
        },
        _ => KeywordSearch {
            tokens: parse_delimited(q, ','),
            query_type: QueryType::MatchAll,
        },
    };

    let results = state.store().autocomplete(&search, MAX_RESULTS).await?;
    debug!(q, suggestions = results.len(), "autocomplete lookup");
    Ok(Json(results).into_response())
}
