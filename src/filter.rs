//! Selection filtering and derived statistics.
//!
//! [`filter`] narrows the record store to the selected station and computes
//! the summary statistics shown next to the map. It is a pure function of
//! its inputs: an empty or unknown selection produces an empty subset with
//! zeroed statistics, never an error.

use crate::aggregator;
use crate::models::{DerivedStatistics, Record};
use std::collections::HashSet;
use tracing::debug;

/// Active subset and its statistics
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<'a> {
    /// Matching records in store order
    pub subset: Vec<&'a Record>,
    pub stats: DerivedStatistics,
}

impl FilterOutcome<'_> {
    pub fn is_empty(&self) -> bool {
        self.subset.is_empty()
    }
}

/// Narrow `records` to the selected station
///
/// With no selection every record passes. Station matching is exact and
/// case-sensitive; records without a station never match a selection.
pub fn filter<'a>(records: &'a [Record], selection: Option<&str>) -> FilterOutcome<'a> {
    let subset: Vec<&Record> = match selection {
        None => records.iter().collect(),
        Some(station) => records
            .iter()
            .filter(|record| record.station() == Some(station))
            .collect(),
    };

    let stats = statistics(&subset);

    debug!(
        "Filtered {} records to {} for selection {:?}",
        records.len(),
        subset.len(),
        selection
    );

    FilterOutcome { subset, stats }
}

/// Compute statistics over an arbitrary subset
pub fn statistics(subset: &[&Record]) -> DerivedStatistics {
    let counts = aggregator::aggregate(subset.iter().copied());

    let unique_item_type_count = subset
        .iter()
        .filter_map(|record| record.item_type.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let earliest_record_date = subset
        .iter()
        .filter_map(|record| record.recorded_at)
        .min()
        .map(|ts| ts.date());

    let records_without_timestamp = subset
        .iter()
        .filter(|record| record.recorded_at.is_none())
        .count();

    DerivedStatistics {
        record_count: subset.len(),
        unique_station_count: counts.len(),
        unique_item_type_count,
        earliest_record_date,
        busiest_station: counts.busiest(),
        records_without_station: counts.unattributed(),
        records_without_timestamp,
    }
}
