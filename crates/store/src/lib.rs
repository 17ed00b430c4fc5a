//! # calc-store - Contract Storage and Query Layer
//!
//! Storage layer for the CALC labor rates API. It owns the contract data
//! model, the deferred query description ([`query::ContractQuery`]), the
//! price statistics helpers, and the SQLite backend that executes queries.
//!
//! The REST layer talks to storage exclusively through the [`core::RateStore`]
//! trait, so alternative backends can be wired in without touching handlers.
//!
//! ## Query model
//!
//! A [`query::ContractQuery`] is a plain value describing a filtered view of
//! the contract table: excluded ids, keyword search, experience and education
//! constraints, exact-match filters, price bounds, and sort order. Nothing is
//! executed until a terminal store operation (count, page fetch, aggregation,
//! value scan) is invoked, which keeps each request to one aggregation scan
//! plus one page fetch.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_store::backends::sqlite::SqliteStore;
//! use calc_store::model::PriceField;
//! use calc_store::query::ContractQuery;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::in_memory()?;
//! store.init_schema()?;
//!
//! let query = ContractQuery::new(PriceField::Current);
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod core;
pub mod error;
pub mod model;
pub mod query;
pub mod stats;

pub use backends::sqlite::{SqliteStore, SqliteStoreConfig};
pub use core::RateStore;
pub use error::{StorageError, StorageResult};
pub use model::{Contract, EducationLevel, NewContract, PriceField};
pub use query::ContractQuery;
pub use stats::PriceStats;
