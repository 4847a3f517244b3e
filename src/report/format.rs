//! Rankings and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation/alerting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! This is where the two-decimal presentation rounding happens; everything
//! upstream carries full precision.

use std::collections::BTreeMap;

use crate::domain::{AggregatedMetrics, GlobalMetrics, Record, round2};
use crate::metrics::AlertSummary;

/// Top-N sources by summed revenue, descending.
///
/// Ties break on source name so the ranking is deterministic for a given
/// input.
pub fn top_sources_by_revenue(
    by_source: &BTreeMap<String, AggregatedMetrics>,
    n: usize,
) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = by_source
        .iter()
        .map(|(source, m)| (source.clone(), m.revenue_sum))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(n);
    ranked
}

/// Format the run summary: dataset shape + global metrics.
pub fn format_run_summary(filtered: &[Record], global: &GlobalMetrics) -> String {
    let mut out = String::new();

    out.push_str("=== demandwatch - Programmatic Revenue Report ===\n");
    out.push_str(&format!("Rows: {}\n", filtered.len()));
    if let (Some(first), Some(last)) = (
        filtered.iter().map(|r| r.date).min(),
        filtered.iter().map(|r| r.date).max(),
    ) {
        out.push_str(&format!("Dates: {first} .. {last}\n"));
    }
    out.push_str(&format!("Total revenue : {:>12.2}\n", global.total_revenue));
    out.push_str(&format!("Impressions   : {:>12}\n", global.total_impressions));
    out.push_str(&format!("Page RPM      : {:>12.2}\n", global.page_rpm_overall));
    out.push_str(&format!("Avg fill rate : {:>11.1}%\n", global.avg_fill_rate));
    out.push_str(&format!("Avg eCPM      : {:>12.2}\n", global.avg_ecpm));
    out.push('\n');

    out
}

/// Format the per-source metrics table.
pub fn format_source_table(by_source: &BTreeMap<String, AggregatedMetrics>) -> String {
    let mut out = String::new();

    out.push_str("Per-source metrics:\n");
    out.push_str(&format!(
        "{:<24} {:>12} {:>12} {:>14} {:>10} {:>10} {:>8} {:>8}\n",
        "source", "revenue", "rev/day", "impressions", "page_rpm", "fill_rate", "ecpm", "ctr"
    ));
    out.push_str(&format!(
        "{:-<24} {:-<12} {:-<12} {:-<14} {:-<10} {:-<10} {:-<8} {:-<8}\n",
        "", "", "", "", "", "", "", ""
    ));

    for (source, m) in by_source {
        out.push_str(&format!(
            "{:<24} {:>12.2} {:>12.2} {:>14} {:>10.2} {:>10.2} {:>8.2} {:>8.2}\n",
            truncate(source, 24),
            round2(m.revenue_sum),
            round2(m.revenue_mean),
            m.impressions_sum,
            round2(m.page_rpm_mean),
            round2(m.fill_rate_mean),
            round2(m.ecpm_mean),
            round2(m.ctr_mean),
        ));
    }

    out
}

/// Format the top-N ranking.
pub fn format_top_sources(ranked: &[(String, f64)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Top {} sources by revenue:\n", ranked.len()));
    for (i, (source, revenue)) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<24} {:>12.2}\n",
            i + 1,
            truncate(source, 24),
            round2(*revenue)
        ));
    }
    out
}

/// Format the alert block.
pub fn format_alerts(summary: &AlertSummary) -> String {
    match summary {
        AlertSummary::AllClear => "Alerts: all sources healthy.\n".to_string(),
        AlertSummary::Triggered(alerts) => {
            let mut out = String::new();
            out.push_str(&format!("Alerts ({}):\n", alerts.len()));
            for alert in alerts {
                out.push_str(&format!(
                    "  [{:<6}] {}\n",
                    alert.severity.label(),
                    alert.message
                ));
            }
            out
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Alert, Severity};

    fn metrics(revenue_sum: f64) -> AggregatedMetrics {
        AggregatedMetrics {
            revenue_sum,
            revenue_mean: revenue_sum / 2.0,
            impressions_sum: 10_000,
            page_rpm_mean: 5.0,
            fill_rate_mean: 85.0,
            ecpm_mean: 5.0,
            ctr_mean: 1.0,
        }
    }

    #[test]
    fn top_sources_ranked_descending_with_name_tiebreak() {
        let by_source: BTreeMap<String, AggregatedMetrics> = [
            ("A".to_string(), metrics(100.0)),
            ("B".to_string(), metrics(300.0)),
            ("C".to_string(), metrics(100.0)),
            ("D".to_string(), metrics(200.0)),
        ]
        .into();

        let top = top_sources_by_revenue(&by_source, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], ("B".to_string(), 300.0));
        assert_eq!(top[1], ("D".to_string(), 200.0));
        // A and C tie on revenue; the name breaks the tie.
        assert_eq!(top[2], ("A".to_string(), 100.0));
    }

    #[test]
    fn top_n_larger_than_group_count_returns_all() {
        let by_source: BTreeMap<String, AggregatedMetrics> =
            [("A".to_string(), metrics(100.0))].into();
        assert_eq!(top_sources_by_revenue(&by_source, 10).len(), 1);
    }

    #[test]
    fn source_table_contains_rounded_values() {
        let by_source: BTreeMap<String, AggregatedMetrics> =
            [("Google_AdEx".to_string(), metrics(123.456))].into();
        let table = format_source_table(&by_source);
        assert!(table.contains("Google_AdEx"));
        assert!(table.contains("123.46"));
    }

    #[test]
    fn alert_block_distinguishes_all_clear() {
        assert!(format_alerts(&AlertSummary::AllClear).contains("healthy"));

        let triggered = AlertSummary::Triggered(vec![Alert {
            severity: Severity::Danger,
            source: "A".to_string(),
            message: "A: low fill rate (70.0%)".to_string(),
        }]);
        let out = format_alerts(&triggered);
        assert!(out.contains("DANGER"));
        assert!(out.contains("70.0%"));
    }
}
