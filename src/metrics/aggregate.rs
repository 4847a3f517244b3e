//! Grouping and summary metrics.
//!
//! Grouping is an explicit fold over the record sequence into a `BTreeMap` of
//! accumulators: accumulation visits records in dataset order, and output
//! iteration is sorted by group key, so results are deterministic for a given
//! input. Means are plain arithmetic means (deliberately not
//! impression-weighted); sums accumulate at full precision and rounding only
//! happens at the presentation boundary.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{AggregatedMetrics, GlobalMetrics, Record};

/// Revenue per thousand impressions.
///
/// Short-circuits to 0 when the impressions total is 0: an empty total is an
/// expected edge case (not malformed input), so it must never surface as a
/// division error or a non-finite value.
pub fn rpm(revenue: f64, impressions: i64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    revenue / impressions as f64 * 1000.0
}

#[derive(Debug, Clone, Default)]
struct Accumulator {
    count: usize,
    revenue: f64,
    impressions: i64,
    page_rpm: f64,
    fill_rate: f64,
    ecpm: f64,
    ctr: f64,
}

impl Accumulator {
    fn add(&mut self, r: &Record) {
        self.count += 1;
        self.revenue += r.revenue;
        self.impressions += r.impressions;
        self.page_rpm += r.page_rpm;
        self.fill_rate += r.fill_rate;
        self.ecpm += r.ecpm;
        self.ctr += r.ctr;
    }

    fn finish(&self) -> AggregatedMetrics {
        // Group keys only exist because at least one record carried them, so
        // count is never 0 here; guard anyway so a future caller cannot turn
        // this into a NaN factory.
        let n = if self.count == 0 { 1.0 } else { self.count as f64 };
        AggregatedMetrics {
            revenue_sum: self.revenue,
            revenue_mean: self.revenue / n,
            impressions_sum: self.impressions,
            page_rpm_mean: self.page_rpm / n,
            fill_rate_mean: self.fill_rate / n,
            ecpm_mean: self.ecpm / n,
            ctr_mean: self.ctr / n,
        }
    }
}

/// Group records by source and summarize each group.
///
/// Each source appears exactly once; iteration order of the returned map is
/// sorted by source name.
pub fn aggregate_by_source(records: &[Record]) -> BTreeMap<String, AggregatedMetrics> {
    let mut acc: BTreeMap<String, Accumulator> = BTreeMap::new();
    for r in records {
        acc.entry(r.source.clone()).or_default().add(r);
    }
    acc.into_iter().map(|(k, a)| (k, a.finish())).collect()
}

/// Daily revenue per source, for time-series consumers.
pub fn revenue_by_source_and_date(
    records: &[Record],
) -> BTreeMap<(String, NaiveDate), f64> {
    let mut out: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    for r in records {
        *out.entry((r.source.clone(), r.date)).or_insert(0.0) += r.revenue;
    }
    out
}

/// Dataset-wide scalar metrics over the (already filtered) dataset.
///
/// `page_rpm_overall` is computed from the totals, which generally differs
/// from the mean of per-row `page_rpm` values; both figures are reported
/// downstream and must not be collapsed into one.
pub fn global_metrics(records: &[Record]) -> GlobalMetrics {
    let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
    let total_impressions: i64 = records.iter().map(|r| r.impressions).sum();
    let n = records.len() as f64;

    let (avg_fill_rate, avg_ecpm) = if records.is_empty() {
        (0.0, 0.0)
    } else {
        (
            records.iter().map(|r| r.fill_rate).sum::<f64>() / n,
            records.iter().map(|r| r.ecpm).sum::<f64>() / n,
        )
    };

    GlobalMetrics {
        total_revenue,
        total_impressions,
        page_rpm_overall: rpm(total_revenue, total_impressions),
        avg_fill_rate,
        avg_ecpm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, source: &str, revenue: f64, impressions: i64) -> Record {
        Record {
            date: date.parse().unwrap(),
            source: source.to_string(),
            revenue,
            impressions,
            page_rpm: rpm(revenue, impressions),
            fill_rate: 85.0,
            ecpm: rpm(revenue, impressions),
            ctr: 1.0,
        }
    }

    #[test]
    fn groups_each_source_once_sorted() {
        let ds = vec![
            rec("2024-01-01", "B", 10.0, 1000),
            rec("2024-01-01", "A", 20.0, 1000),
            rec("2024-01-02", "B", 30.0, 1000),
        ];
        let by_source = aggregate_by_source(&ds);
        let keys: Vec<&String> = by_source.keys().collect();
        assert_eq!(keys, ["A", "B"]);
        assert_eq!(by_source["B"].revenue_sum, 40.0);
        assert_eq!(by_source["B"].revenue_mean, 20.0);
        assert_eq!(by_source["B"].impressions_sum, 2000);
    }

    #[test]
    fn revenue_sum_is_conserved_across_the_partition() {
        let ds = vec![
            rec("2024-01-01", "A", 12.34, 1000),
            rec("2024-01-01", "B", 56.78, 2000),
            rec("2024-01-02", "A", 90.12, 3000),
            rec("2024-01-02", "C", 3.46, 500),
        ];
        let total: f64 = ds.iter().map(|r| r.revenue).sum();
        let grouped: f64 = aggregate_by_source(&ds)
            .values()
            .map(|m| m.revenue_sum)
            .sum();
        assert!((grouped - total).abs() < 1e-9);
    }

    #[test]
    fn zero_impressions_short_circuit_to_zero() {
        assert_eq!(rpm(100.0, 0), 0.0);

        let ds = vec![rec("2024-01-01", "A", 100.0, 0)];
        let global = global_metrics(&ds);
        assert_eq!(global.page_rpm_overall, 0.0);
        assert_eq!(global.total_revenue, 100.0);
    }

    #[test]
    fn overall_rpm_differs_from_mean_of_row_rpms() {
        // Two rows with very different volumes: the totals-based figure is
        // dominated by the high-volume row, the unweighted mean is not.
        let ds = vec![
            rec("2024-01-01", "A", 100.0, 1_000),
            rec("2024-01-01", "B", 100.0, 100_000),
        ];
        let global = global_metrics(&ds);
        let by_source = aggregate_by_source(&ds);

        let mean_of_rpms =
            (by_source["A"].page_rpm_mean + by_source["B"].page_rpm_mean) / 2.0;
        assert!((global.page_rpm_overall - rpm(200.0, 101_000)).abs() < 1e-9);
        assert!((global.page_rpm_overall - mean_of_rpms).abs() > 1.0);
    }

    #[test]
    fn daily_revenue_groups_by_source_and_date() {
        let ds = vec![
            rec("2024-01-01", "A", 10.0, 1000),
            rec("2024-01-01", "A", 5.0, 1000),
            rec("2024-01-02", "A", 7.0, 1000),
            rec("2024-01-01", "B", 1.0, 1000),
        ];
        let daily = revenue_by_source_and_date(&ds);
        assert_eq!(daily.len(), 3);
        assert_eq!(
            daily[&("A".to_string(), "2024-01-01".parse().unwrap())],
            15.0
        );
        assert_eq!(
            daily[&("A".to_string(), "2024-01-02".parse().unwrap())],
            7.0
        );
    }

    #[test]
    fn global_metrics_on_empty_dataset_are_zero() {
        let global = global_metrics(&[]);
        assert_eq!(global.total_revenue, 0.0);
        assert_eq!(global.total_impressions, 0);
        assert_eq!(global.page_rpm_overall, 0.0);
        assert_eq!(global.avg_fill_rate, 0.0);
    }
}
