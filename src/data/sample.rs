//! Synthetic sample dataset generation.
//!
//! Produces a realistic-looking daily dataset for demos and tests without any
//! real partner data. Generation is deterministic for a given seed.
//!
//! The fixed partner list lives here only: the core treats `source` as an open
//! set and must keep accepting partners this module has never heard of.

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Record, round2};
use crate::error::AppError;
use crate::metrics::rpm;

/// Demand partners used for sample data.
pub const SAMPLE_SOURCES: [&str; 15] = [
    "Google_AdEx",
    "Google_OpenBidding",
    "Prebid_Nexx360",
    "Prebid_Richaudience",
    "Prebid_AppNexus",
    "Prebid_Ogury",
    "Prebid_Criteo",
    "Prebid_Optidigital",
    "TAM_Amazon",
    "TAM_IndexExchange",
    "TAM_Outbrain",
    "TAM_Pubmatic",
    "TAM_Onetag",
    "TAM_MediaNet",
    "TAM_Equativ",
];

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default(),
            seed: 42,
        }
    }
}

/// Revenue/volume baselines per partner family.
///
/// Google endpoints dominate volume, Prebid SSPs sit in the middle, TAM
/// partners trail. Matches the rough shape of a mid-size publisher's stack.
fn baselines(source: &str) -> (f64, f64, f64, f64) {
    if source.starts_with("Google") {
        (8_000.0, 1_500.0, 2_000_000.0, 300_000.0)
    } else if source.starts_with("Prebid") {
        (3_000.0, 800.0, 800_000.0, 150_000.0)
    } else {
        (2_500.0, 600.0, 600_000.0, 100_000.0)
    }
}

/// Generate one record per (date, source) over the configured range.
///
/// Derived columns are computed from the generated revenue/impressions, so
/// `ecpm == page_rpm == revenue / impressions * 1000` holds by construction
/// here — unlike external uploads, where pre-computed columns are taken on
/// trust. All monetary/percentage values are rounded to two decimals, the
/// precision a real partner export would carry.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<Record>, AppError> {
    if config.end < config.start {
        return Err(AppError::new(2, "Sample date range is empty (end < start)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::new();

    let mut date = config.start;
    loop {
        for source in SAMPLE_SOURCES {
            let (rev_mean, rev_sd, imp_mean, imp_sd) = baselines(source);

            let rev_dist = Normal::new(rev_mean, rev_sd)
                .map_err(|e| AppError::new(4, format!("Revenue distribution error: {e}")))?;
            let imp_dist = Normal::new(imp_mean, imp_sd)
                .map_err(|e| AppError::new(4, format!("Impression distribution error: {e}")))?;

            let revenue = round2(rev_dist.sample(&mut rng).max(0.0));
            let impressions = (imp_dist.sample(&mut rng) as i64).max(1_000);

            let per_mille = round2(rpm(revenue, impressions));
            let fill_rate = round2(rng.gen_range(75.0..95.0));
            let ctr = round2(rng.gen_range(0.1..2.5));

            records.push(Record {
                date,
                source: source.to_string(),
                revenue,
                impressions,
                page_rpm: per_mille,
                fill_rate,
                ecpm: per_mille,
                ctr,
            });
        }

        if date == config.end {
            break;
        }
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    Ok(records)
}
