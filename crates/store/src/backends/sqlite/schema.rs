//! SQLite schema initialization.

use rusqlite::Connection;

use crate::error::{BackendError, StorageResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contracts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    idv_piid TEXT NOT NULL,
    vendor_name TEXT NOT NULL,
    labor_category TEXT NOT NULL,
    normalized_labor_category TEXT NOT NULL,
    schedule TEXT NOT NULL,
    sin TEXT,
    contractor_site TEXT,
    business_size TEXT,
    education_level INTEGER,
    min_years_experience INTEGER NOT NULL DEFAULT 0,
    current_price REAL,
    next_year_price REAL,
    second_year_price REAL,
    contract_start TEXT,
    contract_end TEXT
);

CREATE INDEX IF NOT EXISTS idx_contracts_normalized_category
    ON contracts (normalized_labor_category);

CREATE INDEX IF NOT EXISTS idx_contracts_current_price
    ON contracts (current_price);
";

/// Creates the contracts table and its indexes if they do not exist.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(SCHEMA).map_err(|e| {
        BackendError::Sqlite {
            message: format!("failed to initialize schema: {}", e),
        }
        .into()
    })
}
