//! HTTP request handlers for the rates API.

pub mod autocomplete;
pub mod export;
pub mod health;
pub mod rates;

pub use autocomplete::autocomplete_handler;
pub use export::export_csv_handler;
pub use health::health_handler;
pub use rates::rates_handler;
