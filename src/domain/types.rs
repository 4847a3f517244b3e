//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation and alert evaluation
//! - exported to JSON/CSV
//! - reloaded later for comparisons

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Required columns, in canonical order.
///
/// This order is load-bearing: schema errors list missing columns in this
/// order, and the numeric-type scan walks the non-date/source suffix in this
/// order (first offender wins).
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "date",
    "source",
    "revenue",
    "impressions",
    "page_rpm",
    "fill_rate",
    "ecpm",
    "ctr",
];

/// The six columns that must be entirely numeric.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "revenue",
    "impressions",
    "page_rpm",
    "fill_rate",
    "ecpm",
    "ctr",
];

/// One (date, source) observation.
///
/// `source` is an open set of demand-partner names; new partners must be
/// accepted without code changes, so it is a plain validated string, never an
/// enum. `page_rpm` and `ecpm` are stored as supplied: for generated data they
/// equal `revenue / impressions * 1000` by construction, but externally
/// supplied values are accepted as-is and never re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub source: String,
    pub revenue: f64,
    /// Expected to be >= 1 for well-formed data. The validator only enforces
    /// that the column is numeric; a zero total is guarded at division sites.
    pub impressions: i64,
    pub page_rpm: f64,
    pub fill_rate: f64,
    pub ecpm: f64,
    pub ctr: f64,
}

/// Per-source summary metrics.
///
/// Means are unweighted arithmetic means over the group's rows (not
/// impression-weighted). Values are kept at full precision; rounding to two
/// decimals happens only at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub revenue_sum: f64,
    pub revenue_mean: f64,
    pub impressions_sum: i64,
    pub page_rpm_mean: f64,
    pub fill_rate_mean: f64,
    pub ecpm_mean: f64,
    pub ctr_mean: f64,
}

/// Dataset-wide scalar metrics over the filtered dataset.
///
/// `page_rpm_overall` is computed from the totals, not as a mean of per-row
/// RPMs, and is therefore a different figure from the per-source
/// `page_rpm_mean`. Both are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    pub total_revenue: f64,
    pub total_impressions: i64,
    pub page_rpm_overall: f64,
    pub avg_fill_rate: f64,
    pub avg_ecpm: f64,
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

impl Severity {
    /// Short label for terminal output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Warning => "WARN",
            Severity::Danger => "DANGER",
        }
    }
}

/// A transient health notification for one source.
///
/// Alerts are advisory output, regenerated on every evaluation; they are never
/// stored and never escalate to a hard failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub source: String,
    pub message: String,
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a range from caller-supplied bounds.
    ///
    /// Anything other than exactly two bounds is a malformed range: the
    /// defined behavior is to fall back to source-only filtering, so this
    /// returns `None` rather than an error.
    pub fn from_bounds(bounds: &[NaiveDate]) -> Option<Self> {
        match bounds {
            [start, end] => Some(Self::new(*start, *end)),
            _ => None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// The active filter selection for a run.
///
/// This is the explicit, request-scoped replacement for ambient UI state:
/// every core call receives the selection rather than reading it from
/// somewhere global.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    /// Date bounds as supplied by the caller. Exactly two bounds form an
    /// inclusive range; any other count disables date filtering.
    pub date_bounds: Vec<NaiveDate>,
    /// Sources to keep. `None` means "all sources present in the dataset";
    /// `Some(empty)` is a defined empty selection.
    pub sources: Option<BTreeSet<String>>,
}

/// Round to two decimals for presentation. Internal accumulation stays at
/// full precision so rounding error never compounds across groups.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn date_range_from_bounds() {
        assert!(DateRange::from_bounds(&[]).is_none());
        assert!(DateRange::from_bounds(&[d("2024-01-01")]).is_none());

        let r = DateRange::from_bounds(&[d("2024-01-01"), d("2024-01-31")]).unwrap();
        assert!(r.contains(d("2024-01-01")));
        assert!(r.contains(d("2024-01-31")));
        assert!(!r.contains(d("2024-02-01")));
    }

    #[test]
    fn round2_basic() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(79.9499), 79.95);
        assert_eq!(round2(3.14159), 3.14);
    }
}
