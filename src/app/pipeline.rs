//! The one-shot reporting pipeline shared by all front-ends.
//!
//! validate -> filter -> aggregate -> evaluate, as a single pure pass over an
//! immutable dataset. No caches and no cross-call state: every invocation
//! recomputes from scratch, which is fine at one-CSV-snapshot dataset sizes,
//! and makes the whole call safe to run from concurrent contexts against
//! independent dataset copies.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{AggregatedMetrics, DateRange, FilterSelection, GlobalMetrics, Record};
use crate::error::DataError;
use crate::filter::{distinct_sources, filter_dataset};
use crate::metrics::{
    AlertSummary, aggregate_by_source, evaluate_alerts, global_metrics,
    revenue_by_source_and_date,
};
use crate::report::top_sources_by_revenue;

/// All computed outputs of a single reporting run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub filtered: Vec<Record>,
    pub by_source: BTreeMap<String, AggregatedMetrics>,
    pub daily_revenue: BTreeMap<(String, NaiveDate), f64>,
    pub global: GlobalMetrics,
    pub alerts: AlertSummary,
    pub top_sources: Vec<(String, f64)>,
}

/// Run the full pipeline over a validated dataset.
///
/// The selection is passed explicitly; there is no ambient "current filter"
/// state anywhere. An empty filter result is terminal ([`DataError::EmptyResult`])
/// so downstream consumers never see an all-zero report that looks legitimate.
pub fn run_report(
    dataset: &[Record],
    selection: &FilterSelection,
    top_n: usize,
) -> Result<RunOutput, DataError> {
    let sources = match &selection.sources {
        Some(set) => set.clone(),
        None => distinct_sources(dataset),
    };
    let range = DateRange::from_bounds(&selection.date_bounds);

    let filtered = filter_dataset(dataset, range.as_ref(), &sources);
    if filtered.is_empty() {
        return Err(DataError::EmptyResult);
    }

    let by_source = aggregate_by_source(&filtered);
    let daily_revenue = revenue_by_source_and_date(&filtered);
    let global = global_metrics(&filtered);
    let alerts = evaluate_alerts(&by_source);
    let top_sources = top_sources_by_revenue(&by_source, top_n);

    Ok(RunOutput {
        filtered,
        by_source,
        daily_revenue,
        global,
        alerts,
        top_sources,
    })
}
