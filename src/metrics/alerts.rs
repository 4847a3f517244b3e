//! Per-source health alerts.
//!
//! Fixed-threshold comparisons over the aggregated per-source metrics. Alerts
//! are advisory: they are regenerated on every evaluation, never stored, and
//! never escalate to a hard failure.

use std::collections::BTreeMap;

use crate::domain::{AggregatedMetrics, Alert, Severity};

/// Fill rates below this mean the source is leaving inventory unfilled.
pub const FILL_RATE_FLOOR: f64 = 80.0;

/// Mean eCPM below this is considered underperforming.
pub const ECPM_FLOOR: f64 = 1.0;

/// Outcome of one evaluation pass.
///
/// `AllClear` is an explicit "checked, found nothing" state so callers can
/// tell it apart from "no evaluation performed" — an absent `AlertSummary`.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertSummary {
    AllClear,
    Triggered(Vec<Alert>),
}

impl AlertSummary {
    pub fn alerts(&self) -> &[Alert] {
        match self {
            AlertSummary::AllClear => &[],
            AlertSummary::Triggered(alerts) => alerts,
        }
    }
}

/// Evaluate both threshold rules for every source.
///
/// Rules are independent: a single source can emit both a danger (fill rate)
/// and a warning (eCPM) in the same pass, with no suppression. Sources are
/// visited in the map's iteration order, and within a source the danger rule
/// fires before the warning rule; output is never regrouped by severity.
pub fn evaluate_alerts(by_source: &BTreeMap<String, AggregatedMetrics>) -> AlertSummary {
    let mut alerts = Vec::new();

    for (source, metrics) in by_source {
        if metrics.fill_rate_mean < FILL_RATE_FLOOR {
            alerts.push(Alert {
                severity: Severity::Danger,
                source: source.clone(),
                message: format!(
                    "{source}: low fill rate ({:.1}%)",
                    metrics.fill_rate_mean
                ),
            });
        }
        if metrics.ecpm_mean < ECPM_FLOOR {
            alerts.push(Alert {
                severity: Severity::Warning,
                source: source.clone(),
                message: format!("{source}: low eCPM (${:.2})", metrics.ecpm_mean),
            });
        }
    }

    if alerts.is_empty() {
        AlertSummary::AllClear
    } else {
        AlertSummary::Triggered(alerts)
    }
}
