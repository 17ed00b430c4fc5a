//! Axum extractors and parameter parsing for the rates API.

pub mod pagination;
pub mod params;
pub mod query_compiler;
pub mod tokens;

pub use pagination::Pagination;
pub use params::ParamBag;
