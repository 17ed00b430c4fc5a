//! Paginated JSON response for rate listings.
//!
//! The body carries the total match count, absolute next/previous page
//! links, the whole-set price statistics, and the page of contract records:
//!
//! ```json
//! {
//!   "count": 1234,
//!   "next": "http://host/api/rates/?q=engineer&_count=200&_offset=200",
//!   "previous": null,
//!   "minimum": "15.00",
//!   "maximum": "45.50",
//!   "average": "27.10",
//!   "first_standard_deviation": "11.71",
//!   "results": [ ... ]
//! }
//! ```

use serde::Serialize;
use url::form_urlencoded;

use calc_store::model::Contract;
use calc_store::stats::PriceStats;

use crate::extractors::pagination::Pagination;
use crate::extractors::params::ParamBag;

/// A page of rate results with whole-set statistics.
#[derive(Debug, Serialize)]
pub struct RatesPage {
    /// Total number of matching records, independent of the page slice.
    pub count: u64,
    /// Absolute URL of the next page, if one exists.
    pub next: Option<String>,
    /// Absolute URL of the previous page, if one exists.
    pub previous: Option<String>,
    /// Statistics over the entire filtered set.
    #[serde(flatten)]
    pub stats: PriceStats,
    /// The requested page of records.
    pub results: Vec<Contract>,
}

impl RatesPage {
    /// Assembles a page, deriving the next/previous links from the request's
    /// own parameters.
    pub fn new(
        base_url: &str,
        path: &str,
        params: &ParamBag,
        pagination: &Pagination,
        count: u64,
        stats: PriceStats,
        results: Vec<Contract>,
    ) -> Self {
        let next = if (pagination.next_offset() as u64) < count {
            Some(page_url(
                base_url,
                path,
                params,
                pagination.count(),
                pagination.next_offset(),
            ))
        } else {
            None
        };
        let previous = pagination
            .prev_offset()
            .map(|offset| page_url(base_url, path, params, pagination.count(), offset));

        Self {
            count,
            next,
            previous,
            stats,
            results,
        }
    }
}

/// Rebuilds the request URL with the pagination window replaced; every
/// filter parameter survives the rewrite.
fn page_url(base_url: &str, path: &str, params: &ParamBag, count: usize, offset: usize) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.pairs() {
        if key != "_count" && key != "_offset" {
            serializer.append_pair(key, value);
        }
    }
    serializer.append_pair("_count", &count.to_string());
    serializer.append_pair("_offset", &offset.to_string());

    format!(
        "{}{}?{}",
        base_url.trim_end_matches('/'),
        path,
        serializer.finish()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> PriceStats {
        PriceStats::default()
    }

    #[test]
    fn first_page_has_no_previous_link() {
        let params = ParamBag::from_query("q=engineer");
        let pagination = Pagination::new(10, 0, 100);
        let page = RatesPage::new(
            "http://localhost:8080",
            "/api/rates/",
            &params,
            &pagination,
            25,
            stats(),
            vec![],
        );

        assert!(page.previous.is_none());
        let next = page.next.unwrap();
        assert!(next.starts_with("http://localhost:8080/api/rates/?"));
        assert!(next.contains("q=engineer"));
        assert!(next.contains("_offset=10"));
    }

    #[test]
    fn last_page_has_no_next_link() {
        let params = ParamBag::from_query("_count=10&_offset=20");
        let pagination = Pagination::new(10, 20, 100);
        let page = RatesPage::new(
            "http://localhost:8080",
            "/api/rates/",
            &params,
            &pagination,
            25,
            stats(),
            vec![],
        );

        assert!(page.next.is_none());
        let previous = page.previous.unwrap();
        assert!(previous.contains("_offset=10"));
        // The rewritten window appears exactly once.
        assert_eq!(previous.matches("_offset=").count(), 1);
    }

    #[test]
    fn links_preserve_filter_parameters() {
        let params = ParamBag::from_query("q=legal+assistant&min_education=BA&_offset=10");
        let pagination = Pagination::new(10, 10, 100);
        let page = RatesPage::new(
            "http://localhost:8080",
            "/api/rates/",
            &params,
            &pagination,
            100,
            stats(),
            vec![],
        );

        let next = page.next.unwrap();
        assert!(next.contains("q=legal+assistant"));
        assert!(next.contains("min_education=BA"));
        assert!(next.contains("_offset=20"));

        let previous = page.previous.unwrap();
        assert!(previous.contains("_offset=0"));
    }

    #[test]
    fn exact_boundary_has_no_next() {
        let params = ParamBag::from_query("");
        let pagination = Pagination::new(10, 10, 100);
        let page = RatesPage::new(
            "http://localhost:8080",
            "/api/rates/",
            &params,
            &pagination,
            20,
            stats(),
            vec![],
        );
        assert!(page.next.is_none());
    }
}
