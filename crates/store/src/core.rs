//! Storage trait the REST layer programs against.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::model::{Contract, LaborCategoryCount};
use crate::query::{ContractQuery, KeywordSearch};
use crate::stats::PriceAggregate;

/// Read-only access to the contract store.
///
/// All operations take a [`ContractQuery`] by reference and leave it
/// untouched; a query value can be reused across the count, aggregation,
/// and page-fetch calls of one request.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Short backend identifier for logs and health checks.
    fn backend_name(&self) -> &'static str;

    /// Number of contracts matching the query.
    async fn count(&self, query: &ContractQuery) -> StorageResult<u64>;

    /// One page of matching contracts, in the query's sort order.
    async fn fetch_page(
        &self,
        query: &ContractQuery,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<Contract>>;

    /// Every matching contract, in the query's sort order. Used by the CSV
    /// export, which is not paginated.
    async fn fetch_all(&self, query: &ContractQuery) -> StorageResult<Vec<Contract>>;

    /// Single-pass aggregate of the query's selected price column over the
    /// entire filtered set.
    async fn aggregate_prices(&self, query: &ContractQuery) -> StorageResult<PriceAggregate>;

    /// Every value of the selected price column, for histogram bucketing.
    async fn price_values(&self, query: &ContractQuery) -> StorageResult<Vec<f64>>;

    /// Normalized labor categories matching the keyword search, with
    /// occurrence counts, ordered by count descending and truncated to
    /// `limit`.
    async fn autocomplete(
        &self,
        keyword: &KeywordSearch,
        limit: usize,
    ) -> StorageResult<Vec<LaborCategoryCount>>;

    /// Cheap liveness check against the underlying database.
    async fn ping(&self) -> StorageResult<()>;
}
