//! Pagination extractor.
//!
//! Extracts and validates the `_count` / `_offset` parameters.

use crate::error::ApiError;
use crate::extractors::params::ParamBag;

/// Pagination window for a rate listing.
///
/// Built from the request's parameter bag with the configured default and
/// maximum page sizes; `_count` is capped at the maximum.
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Page size (number of items to return).
    count: usize,
    /// Offset (number of items to skip).
    offset: usize,
}

impl Pagination {
    /// Creates a new Pagination, capping `count` at `max_count`.
    pub fn new(count: usize, offset: usize, max_count: usize) -> Self {
        Self {
            count: count.min(max_count),
            offset,
        }
    }

    /// Reads `_count` and `_offset` from the parameter bag.
    ///
    /// Non-numeric values are a client error.
    pub fn from_params(
        params: &ParamBag,
        default_count: usize,
        max_count: usize,
    ) -> Result<Self, ApiError> {
        let count = match params.first("_count") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| ApiError::invalid_number("_count", raw))?,
            None => default_count,
        };
        let offset = match params.first("_offset") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| ApiError::invalid_number("_offset", raw))?,
            None => 0,
        };
        Ok(Self::new(count, offset, max_count))
    }

    /// Returns the page size.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the offset of the next page.
    pub fn next_offset(&self) -> usize {
        self.offset + self.count
    }

    /// Returns the offset of the previous page, or `None` on the first page.
    pub fn prev_offset(&self) -> Option<usize> {
        if self.offset == 0 {
            None
        } else {
            Some(self.offset.saturating_sub(self.count))
        }
    }
}
