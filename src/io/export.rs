//! Export the filtered dataset and the computed report.
//!
//! Two formats:
//! - CSV: the filtered dataset with the original eight columns, in original
//!   row order, meant to round-trip back through the validator unchanged
//! - JSON: the "portable" report (per-source metrics + global metrics +
//!   alerts), easy to consume in downstream scripts

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{
    AggregatedMetrics, Alert, GlobalMetrics, REQUIRED_COLUMNS, Record, round2,
};
use crate::error::AppError;
use crate::metrics::AlertSummary;

/// Serialize a dataset to CSV text.
///
/// Floats use Rust's shortest round-trip formatting, so re-parsing the output
/// yields bit-identical values and re-validating it reproduces the same row
/// set. Row order is preserved from the input. Fields are RFC 4180-quoted by
/// the csv writer: the source set is open, so partner names may carry commas
/// or quotes and still have to survive the round-trip.
pub fn dataset_to_csv_string(records: &[Record]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(REQUIRED_COLUMNS)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        writer
            .write_record([
                r.date.format("%Y-%m-%d").to_string(),
                r.source.clone(),
                r.revenue.to_string(),
                r.impressions.to_string(),
                r.page_rpm.to_string(),
                r.fill_rate.to_string(),
                r.ecpm.to_string(),
                r.ctr.to_string(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::new(2, format!("Export CSV is not valid UTF-8: {e}")))
}

/// Write the filtered dataset to a CSV file.
pub fn write_dataset_csv(path: &Path, records: &[Record]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    file.write_all(dataset_to_csv_string(records)?.as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))?;
    Ok(())
}

/// The portable JSON report.
///
/// Metric values are rounded to two decimals here: the report file is a
/// presentation surface, not an intermediate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub sources: BTreeMap<String, AggregatedMetrics>,
    pub global: GlobalMetrics,
    pub all_clear: bool,
    pub alerts: Vec<Alert>,
}

impl ReportFile {
    pub fn new(
        by_source: &BTreeMap<String, AggregatedMetrics>,
        global: &GlobalMetrics,
        summary: &AlertSummary,
    ) -> Self {
        let sources = by_source
            .iter()
            .map(|(source, m)| {
                (
                    source.clone(),
                    AggregatedMetrics {
                        revenue_sum: round2(m.revenue_sum),
                        revenue_mean: round2(m.revenue_mean),
                        impressions_sum: m.impressions_sum,
                        page_rpm_mean: round2(m.page_rpm_mean),
                        fill_rate_mean: round2(m.fill_rate_mean),
                        ecpm_mean: round2(m.ecpm_mean),
                        ctr_mean: round2(m.ctr_mean),
                    },
                )
            })
            .collect();

        ReportFile {
            tool: "dw".to_string(),
            sources,
            global: GlobalMetrics {
                total_revenue: round2(global.total_revenue),
                total_impressions: global.total_impressions,
                page_rpm_overall: round2(global.page_rpm_overall),
                avg_fill_rate: round2(global.avg_fill_rate),
                avg_ecpm: round2(global.avg_ecpm),
            },
            all_clear: matches!(summary, AlertSummary::AllClear),
            alerts: summary.alerts().to_vec(),
        }
    }
}

/// Write the report JSON file.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}
