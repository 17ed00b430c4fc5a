//! Raw query parameter extraction.
//!
//! The rates endpoints accept a large, open-ended set of filter parameters,
//! some of which may repeat (`exclude=1&exclude=2`). Rather than a serde
//! struct per handler, requests are parsed once into an order-preserving
//! multimap that the filter compiler reads from.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use url::form_urlencoded;

/// An immutable multimap of query parameters.
///
/// Repeated keys are preserved in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ParamBag {
    pairs: Vec<(String, String)>,
}

impl ParamBag {
    /// Parses a raw query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Returns the first value for `name`, if any.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name`, in arrival order.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns every key/value pair, in arrival order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl<S> FromRequestParts<S> for ParamBag
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        Ok(ParamBag::from_query(query))
    }
}
