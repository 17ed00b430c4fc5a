//! Response presenters: paginated JSON and the CSV attachment.

pub mod csv;
pub mod page;

pub use page::RatesPage;
