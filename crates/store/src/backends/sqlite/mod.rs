//! SQLite backend.
//!
//! A complete [`crate::core::RateStore`] implementation over a pooled
//! SQLite database. Supports in-memory databases (used throughout the test
//! suites) and file-based databases for real deployments.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE contracts (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     idv_piid TEXT NOT NULL,
//!     vendor_name TEXT NOT NULL,
//!     labor_category TEXT NOT NULL,
//!     normalized_labor_category TEXT NOT NULL,
//!     schedule TEXT NOT NULL,
//!     sin TEXT,
//!     contractor_site TEXT,
//!     business_size TEXT,
//!     education_level INTEGER,   -- ordinal rank, see EducationLevel
//!     min_years_experience INTEGER NOT NULL DEFAULT 0,
//!     current_price REAL,
//!     next_year_price REAL,
//!     second_year_price REAL,
//!     contract_start TEXT,       -- ISO-8601 date
//!     contract_end TEXT
//! );
//! ```

mod backend;
mod query_builder;
mod schema;
mod store_impl;

pub use backend::{SqliteStore, SqliteStoreConfig};
