//! [`RateStore`] implementation for SQLite.

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Row, params_from_iter};
use tracing::debug;

use crate::core::RateStore;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::model::{Contract, EducationLevel, LaborCategoryCount};
use crate::query::{ContractQuery, KeywordSearch};
use crate::stats::{self, PriceAggregate};

use super::SqliteStore;
use super::query_builder::{SqlParam, build_order_by, build_where, keyword_clause};

const CONTRACT_COLUMNS: &str = "id, idv_piid, vendor_name, labor_category, \
     normalized_labor_category, schedule, sin, contractor_site, \
     business_size, education_level, min_years_experience, current_price, \
     next_year_price, second_year_price, contract_start, contract_end";

fn sqlite_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Sqlite { message })
}

fn corrupt_row(message: String) -> StorageError {
    StorageError::Backend(BackendError::CorruptRow { message })
}

fn parse_date(value: Option<String>) -> StorageResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| corrupt_row(format!("bad date '{}': {}", s, e))),
    }
}

fn row_to_contract(row: &Row<'_>) -> rusqlite::Result<RawContractRow> {
    Ok(RawContractRow {
        id: row.get(0)?,
        idv_piid: row.get(1)?,
        vendor_name: row.get(2)?,
        labor_category: row.get(3)?,
        normalized_labor_category: row.get(4)?,
        schedule: row.get(5)?,
        sin: row.get(6)?,
        contractor_site: row.get(7)?,
        business_size: row.get(8)?,
        education_level: row.get(9)?,
        min_years_experience: row.get(10)?,
        current_price: row.get(11)?,
        next_year_price: row.get(12)?,
        second_year_price: row.get(13)?,
        contract_start: row.get(14)?,
        contract_end: row.get(15)?,
    })
}

/// A contract row as stored, before decimal/date/enum decoding.
struct RawContractRow {
    id: i64,
    idv_piid: String,
    vendor_name: String,
    labor_category: String,
    normalized_labor_category: String,
    schedule: String,
    sin: Option<String>,
    contractor_site: Option<String>,
    business_size: Option<String>,
    education_level: Option<i64>,
    min_years_experience: i64,
    current_price: Option<f64>,
    next_year_price: Option<f64>,
    second_year_price: Option<f64>,
    contract_start: Option<String>,
    contract_end: Option<String>,
}

impl RawContractRow {
    fn decode(self) -> StorageResult<Contract> {
        let education_level = match self.education_level {
            None => None,
            Some(rank) => Some(EducationLevel::from_rank(rank).ok_or_else(|| {
                corrupt_row(format!("bad education rank {}", rank))
            })?),
        };

        Ok(Contract {
            id: self.id,
            idv_piid: self.idv_piid,
            vendor_name: self.vendor_name,
            labor_category: self.labor_category,
            normalized_labor_category: self.normalized_labor_category,
            schedule: self.schedule,
            sin: self.sin,
            contractor_site: self.contractor_site,
            business_size: self.business_size,
            education_level,
            min_years_experience: self.min_years_experience,
            current_price: self.current_price.and_then(stats::currency),
            next_year_price: self.next_year_price.and_then(stats::currency),
            second_year_price: self.second_year_price.and_then(stats::currency),
            contract_start: parse_date(self.contract_start)?,
            contract_end: parse_date(self.contract_end)?,
        })
    }
}

impl SqliteStore {
    fn fetch_contracts(
        &self,
        query: &ContractQuery,
        page: Option<(usize, usize)>,
    ) -> StorageResult<Vec<Contract>> {
        let conn = self.get_connection()?;
        let where_clause = build_where(query);
        let order_by = build_order_by(&query.sort);

        let mut sql = format!(
            "SELECT {} FROM contracts WHERE {} {}",
            CONTRACT_COLUMNS, where_clause.sql, order_by
        );
        let mut params = where_clause.params;
        if let Some((limit, offset)) = page {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(SqlParam::Integer(limit as i64));
            params.push(SqlParam::Integer(offset as i64));
        }
        debug!(sql = %sql, "executing contract fetch");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| sqlite_error(format!("failed to prepare fetch: {}", e)))?;

        let rows = stmt
            .query_map(params_from_iter(params.iter()), row_to_contract)
            .map_err(|e| sqlite_error(format!("failed to execute fetch: {}", e)))?;

        let mut contracts = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| sqlite_error(format!("failed to read row: {}", e)))?;
            contracts.push(raw.decode()?);
        }
        Ok(contracts)
    }
}

#[async_trait]
impl RateStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn count(&self, query: &ContractQuery) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let where_clause = build_where(query);
        let sql = format!(
            "SELECT COUNT(*) FROM contracts WHERE {}",
            where_clause.sql
        );

        conn.query_row(&sql, params_from_iter(where_clause.params.iter()), |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n as u64)
        .map_err(|e| sqlite_error(format!("failed to count contracts: {}", e)))
    }

    async fn fetch_page(
        &self,
        query: &ContractQuery,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<Contract>> {
        self.fetch_contracts(query, Some((limit, offset)))
    }

    async fn fetch_all(&self, query: &ContractQuery) -> StorageResult<Vec<Contract>> {
        self.fetch_contracts(query, None)
    }

    async fn aggregate_prices(&self, query: &ContractQuery) -> StorageResult<PriceAggregate> {
        let conn = self.get_connection()?;
        let where_clause = build_where(query);
        let col = query.price_field.column();

        // One pass over the full filtered set; the page slice never affects
        // these numbers.
        let sql = format!(
            "SELECT COUNT({col}), MIN({col}), MAX({col}), \
                    COALESCE(SUM({col}), 0), COALESCE(SUM({col} * {col}), 0) \
             FROM contracts WHERE {}",
            where_clause.sql,
            col = col
        );

        conn.query_row(&sql, params_from_iter(where_clause.params.iter()), |row| {
            Ok(PriceAggregate {
                count: row.get::<_, i64>(0)? as u64,
                minimum: row.get(1)?,
                maximum: row.get(2)?,
                sum: row.get(3)?,
                sum_squares: row.get(4)?,
            })
        })
        .map_err(|e| sqlite_error(format!("failed to aggregate prices: {}", e)))
    }

    async fn price_values(&self, query: &ContractQuery) -> StorageResult<Vec<f64>> {
        let conn = self.get_connection()?;
        let where_clause = build_where(query);
        let sql = format!(
            "SELECT {} FROM contracts WHERE {}",
            query.price_field.column(),
            where_clause.sql
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| sqlite_error(format!("failed to prepare value scan: {}", e)))?;

        let rows = stmt
            .query_map(params_from_iter(where_clause.params.iter()), |row| {
                row.get::<_, f64>(0)
            })
            .map_err(|e| sqlite_error(format!("failed to scan prices: {}", e)))?;

        let mut values = Vec::new();
        for value in rows {
            values.push(
                value.map_err(|e| sqlite_error(format!("failed to read price: {}", e)))?,
            );
        }
        Ok(values)
    }

    async fn autocomplete(
        &self,
        keyword: &KeywordSearch,
        limit: usize,
    ) -> StorageResult<Vec<LaborCategoryCount>> {
        let conn = self.get_connection()?;
        let clause = keyword_clause(keyword);
        let where_sql = if clause.is_empty() {
            "1 = 0".to_string()
        } else {
            clause.sql.clone()
        };

        let sql = format!(
            "SELECT normalized_labor_category, COUNT(*) AS n \
             FROM contracts WHERE {} \
             GROUP BY normalized_labor_category \
             ORDER BY n DESC, normalized_labor_category ASC \
             LIMIT ?",
            where_sql
        );

        let mut params = clause.params;
        params.push(SqlParam::Integer(limit as i64));

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| sqlite_error(format!("failed to prepare autocomplete: {}", e)))?;

        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                Ok(LaborCategoryCount {
                    labor_category: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })
            .map_err(|e| sqlite_error(format!("failed to execute autocomplete: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(
                row.map_err(|e| sqlite_error(format!("failed to read category: {}", e)))?,
            );
        }
        Ok(results)
    }

    async fn ping(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| sqlite_error(format!("ping failed: {}", e)))
    }
}
