//! Dataset filtering.
//!
//! Narrows a validated dataset to a date range and a set of selected sources.
//! Filtering never mutates the input; it always produces a new dataset with
//! the original row order preserved (stable CSV round-trips depend on this).

use std::collections::BTreeSet;

use crate::domain::{DateRange, Record};

/// Keep every record whose `date` falls inside `range` (when one is given)
/// and whose `source` is in `sources`.
///
/// A missing range means "no date constraint" — the defined fallback when the
/// caller supplied a malformed range (see [`DateRange::from_bounds`]). An
/// empty source set yields an empty dataset; that is a defined selection, not
/// an error. The caller decides what an empty result means (the pipeline
/// treats it as terminal).
pub fn filter_dataset(
    records: &[Record],
    range: Option<&DateRange>,
    sources: &BTreeSet<String>,
) -> Vec<Record> {
    records
        .iter()
        .filter(|r| range.is_none_or(|range| range.contains(r.date)))
        .filter(|r| sources.contains(&r.source))
        .cloned()
        .collect()
}

/// All distinct sources present in a dataset, sorted.
///
/// Used as the default selection ("everything") and by front-ends to offer
/// choices. The source set is open; this is derived from the data, never from
/// a fixed list.
pub fn distinct_sources(records: &[Record]) -> BTreeSet<String> {
    records.iter().map(|r| r.source.clone()).collect()
}
