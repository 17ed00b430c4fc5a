//! Rate search handler.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use calc_store::RateStore;
use calc_store::model::PriceField;
use calc_store::stats;
use tracing::debug;

use crate::error::ApiResult;
use crate::extractors::pagination::Pagination;
use crate::extractors::params::ParamBag;
use crate::extractors::query_compiler;
use crate::responses::RatesPage;
use crate::state::AppState;

/// Handler for the rate listing endpoint.
///
/// # HTTP Request
///
/// `GET [base]/api/rates/?<filters>&contract-year=<0|1|2>&histogram=<n>&_count=<n>&_offset=<n>`
///
/// # Response
///
/// `200 OK` with a paginated JSON body: total count, next/previous links,
/// whole-set price statistics (optionally a histogram), and the page of
/// records. Malformed numeric parameters and unknown sort or education
/// codes are `400 Bad Request`.
pub async fn rates_handler<S>(
    State(state): State<AppState<S>>,
    params: ParamBag,
) -> ApiResult<Response>
where
    S: RateStore + 'static,
{
    let price_field = PriceField::from_year_code(params.first("contract-year"));
    let query = query_compiler::compile(&params, price_field)?;
    debug!(?price_field, "compiled rates query");

    let count = state.store().count(&query).await?;
    let aggregate = state.store().aggregate_prices(&query).await?;
    let mut stats = stats::summarize(&aggregate);

    // An unusable bin count means "no histogram", never an error.
    if let Some(bins) = params.first("histogram").and_then(|b| b.parse::<u32>().ok())
        && bins > 0
    {
        let values = state.store().price_values(&query).await?;
        stats.wage_histogram = Some(stats::histogram(&values, bins));
    }

    let pagination = Pagination::from_params(
        &params,
        state.default_page_size(),
        state.max_page_size(),
    )?;
    let results = state
        .store()
        .fetch_page(&query, pagination.count(), pagination.offset())
        .await?;

    let page = RatesPage::new(
        state.base_url(),
        "/api/rates/",
        &params,
        &pagination,
        count,
        stats,
        results,
    );
    Ok(Json(page).into_response())
}
