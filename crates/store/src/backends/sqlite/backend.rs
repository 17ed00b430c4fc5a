//! SQLite store handle and connection pool.

use std::fmt::Debug;
use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{BackendError, StorageResult};
use crate::model::{NewContract, normalize_labor_category};

use super::schema;

/// SQLite-backed contract store.
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    config: SqliteStoreConfig,
    is_memory: bool,
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("config", &self.config)
            .field("is_memory", &self.is_memory)
            .finish_non_exhaustive()
    }
}

/// Configuration for the SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connection acquisition timeout in milliseconds.
    pub connection_timeout_ms: u64,
    /// SQLite busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
    /// Enable WAL mode for better concurrent reads (file databases only).
    pub enable_wal: bool,
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_ms: 30_000,
            busy_timeout_ms: 5_000,
            enable_wal: true,
        }
    }
}

impl SqliteStore {
    /// Creates a new in-memory store.
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_config(":memory:", SqliteStoreConfig::default())
    }

    /// Opens or creates a file-based database.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(path, SqliteStoreConfig::default())
    }

    /// Creates a store with custom configuration.
    pub fn with_config<P: AsRef<Path>>(
        path: P,
        config: SqliteStoreConfig,
    ) -> StorageResult<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let is_memory = path_str == ":memory:";

        let manager = SqliteConnectionManager::file(path.as_ref());

        // Each pooled `:memory:` connection would open its own database, so
        // an in-memory store is pinned to a single connection.
        let max_size = if is_memory { 1 } else { config.max_connections };

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(std::time::Duration::from_millis(
                config.connection_timeout_ms,
            ))
            .build(manager)
            .map_err(|e| BackendError::ConnectionFailed {
                message: e.to_string(),
            })?;

        let store = Self {
            pool,
            config,
            is_memory,
        };
        store.configure_connection()?;

        Ok(store)
    }

    /// Initializes the database schema.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        schema::initialize_schema(&conn)
    }

    /// Gets a connection from the pool.
    pub(crate) fn get_connection(
        &self,
    ) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| BackendError::ConnectionFailed {
                message: e.to_string(),
            }.into())
    }

    fn configure_connection(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;

        conn.busy_timeout(std::time::Duration::from_millis(self.config.busy_timeout_ms))
            .map_err(|e| BackendError::Sqlite {
                message: format!("failed to set busy timeout: {}", e),
            })?;

        if self.config.enable_wal && !self.is_memory {
            conn.execute_batch("PRAGMA journal_mode = WAL")
                .map_err(|e| BackendError::Sqlite {
                    message: format!("failed to enable WAL mode: {}", e),
                })?;
        }

        Ok(())
    }

    /// Returns whether this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    /// Inserts contracts, returning their assigned row ids.
    ///
    /// The normalized labor category is computed here so every row is
    /// groupable by the autocomplete query.
    pub fn insert_contracts(&self, contracts: &[NewContract]) -> StorageResult<Vec<i64>> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction().map_err(|e| BackendError::Sqlite {
            message: format!("failed to begin transaction: {}", e),
        })?;

        let mut ids = Vec::with_capacity(contracts.len());
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO contracts (
                        idv_piid, vendor_name, labor_category,
                        normalized_labor_category, schedule, sin,
                        contractor_site, business_size, education_level,
                        min_years_experience, current_price, next_year_price,
                        second_year_price, contract_start, contract_end
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                )
                .map_err(|e| BackendError::Sqlite {
                    message: format!("failed to prepare insert: {}", e),
                })?;

            for contract in contracts {
                stmt.execute(params![
                    contract.idv_piid,
                    contract.vendor_name,
                    contract.labor_category,
                    normalize_labor_category(&contract.labor_category),
                    contract.schedule,
                    contract.sin,
                    contract.contractor_site,
                    contract.business_size,
                    contract.education_level.map(|l| l.rank()),
                    contract.min_years_experience,
                    contract.current_price.and_then(|d| d.to_f64()),
                    contract.next_year_price.and_then(|d| d.to_f64()),
                    contract.second_year_price.and_then(|d| d.to_f64()),
                    contract.contract_start.map(|d| d.to_string()),
                    contract.contract_end.map(|d| d.to_string()),
                ])
                .map_err(|e| BackendError::Sqlite {
                    message: format!("failed to insert contract: {}", e),
                })?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit().map_err(|e| BackendError::Sqlite {
            message: format!("failed to commit insert: {}", e),
        })?;

        Ok(ids)
    }
}
