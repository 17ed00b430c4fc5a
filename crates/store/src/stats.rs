//! Price statistics over a filtered contract set.
//!
//! The SQLite backend gathers the raw moments (count, min, max, sum, sum of
//! squares) in a single pass; this module turns them into the rounded
//! payload the API exposes, and buckets raw values into a histogram when one
//! is requested.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Raw single-pass aggregate of a price column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceAggregate {
    /// Number of non-null prices.
    pub count: u64,
    /// Smallest price, if any rows matched.
    pub minimum: Option<f64>,
    /// Largest price, if any rows matched.
    pub maximum: Option<f64>,
    /// Sum of prices.
    pub sum: f64,
    /// Sum of squared prices.
    pub sum_squares: f64,
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower bound.
    pub min: Decimal,
    /// Upper bound (inclusive for the last bucket).
    pub max: Decimal,
    /// Number of values in this bucket.
    pub count: u64,
}

/// The statistics payload attached to a rates response.
///
/// Average and standard deviation are rounded to two decimal places with
/// midpoint-away-from-zero rounding; minimum and maximum keep their native
/// two-decimal currency precision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceStats {
    pub minimum: Option<Decimal>,
    pub maximum: Option<Decimal>,
    pub average: Option<Decimal>,
    pub first_standard_deviation: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wage_histogram: Option<Vec<HistogramBin>>,
}

/// Quantizes a float to a two-decimal-place currency value.
pub(crate) fn currency(value: f64) -> Option<Decimal> {
    let mut d = Decimal::from_f64_retain(value)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(2);
    Some(d)
}

/// Derives the rounded statistics payload from a raw aggregate.
///
/// The standard deviation is the sample deviation (n - 1); with fewer than
/// two prices it is `None`.
pub fn summarize(agg: &PriceAggregate) -> PriceStats {
    let n = agg.count as f64;

    let average = if agg.count > 0 {
        currency(agg.sum / n)
    } else {
        None
    };

    let first_standard_deviation = if agg.count > 1 {
        let variance = ((agg.sum_squares - agg.sum * agg.sum / n) / (n - 1.0)).max(0.0);
        currency(variance.sqrt())
    } else {
        None
    };

    PriceStats {
        minimum: agg.minimum.and_then(currency),
        maximum: agg.maximum.and_then(currency),
        average,
        first_standard_deviation,
        wage_histogram: None,
    }
}

/// Largest number of buckets a histogram will produce.
pub const MAX_HISTOGRAM_BINS: u32 = 1_000;

/// Buckets `values` into `bins` equal-width ranges over their observed span.
///
/// The bucket count is capped at [`MAX_HISTOGRAM_BINS`]; past that point
/// extra buckets are all empty and the allocation is unbounded. A
/// zero-width span (all values equal) collapses to a single bucket; a
/// value equal to the span's maximum lands in the last bucket. An empty
/// value set yields an empty histogram.
pub fn histogram(values: &[f64], bins: u32) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let bins = bins.min(MAX_HISTOGRAM_BINS);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if span <= f64::EPSILON {
        return vec![HistogramBin {
            min: currency(min).unwrap_or_default(),
            max: currency(max).unwrap_or_default(),
            count: values.len() as u64,
        }];
    }

    let width = span / bins as f64;
    let mut counts = vec![0u64; bins as usize];
    for &v in values {
        let index = (((v - min) / width) as usize).min(bins as usize - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            min: currency(min + width * i as f64).unwrap_or_default(),
            max: currency(min + width * (i as f64 + 1.0)).unwrap_or_default(),
            count,
        })
        .collect()
}
