//! CSV export handler.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use axum::extract::State;
use calc_store::RateStore;
use calc_store::model::PriceField;
use tracing::debug;

use crate::error::ApiResult;
use crate::extractors::params::ParamBag;
use crate::extractors::query_compiler;
use crate::responses::csv::{self, CsvCriteria};
use crate::state::AppState;

/// Handler for the CSV export endpoint.
///
/// Applies the same filters as the rate listing, always against the
/// current-year price, and streams the entire (unpaginated) result set as a
/// spreadsheet attachment named `pricing_results.csv`.
///
/// # HTTP Request
///
/// `GET [base]/api/rates/csv/?<filters>`
pub async fn export_csv_handler<S>(
    State(state): State<AppState<S>>,
    params: ParamBag,
) -> ApiResult<Response>
where
    S: RateStore + 'static,
{
    let query = query_compiler::compile(&params, PriceField::Current)?;
    let contracts = state.store().fetch_all(&query).await?;
    debug!(records = contracts.len(), "exporting rates as csv");

    let criteria = CsvCriteria::from_params(&params);
    let body = csv::render(&criteria, &contracts)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"pricing_results.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}
