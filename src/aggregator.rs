//! Per-station aggregation.
//!
//! Counts records by station name and resolves a display location for each
//! station. Both passes are pure and iterate stations in ascending name
//! order, so every downstream consumer sees a stable ordering.

use crate::models::{GeoPoint, Record, StationAggregate};
use std::collections::BTreeMap;

/// Record counts keyed by station name
///
/// Records without a station name are not attributed to any station; they
/// are tallied separately in [`StationCounts::unattributed`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StationCounts {
    counts: BTreeMap<String, usize>,
    unattributed: usize,
}

impl StationCounts {
    /// Count for one station, `None` when the station never appears
    pub fn get(&self, station_name: &str) -> Option<usize> {
        self.counts.get(station_name).copied()
    }

    /// Number of distinct stations
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all station counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Records excluded from aggregation for lacking a station name
    pub fn unattributed(&self) -> usize {
        self.unattributed
    }

    /// Iterate `(station, count)` in ascending station order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Materialize the mapping as aggregates in ascending station order
    pub fn to_aggregates(&self) -> Vec<StationAggregate> {
        self.iter()
            .map(|(station_name, count)| StationAggregate {
                station_name: station_name.to_string(),
                count,
            })
            .collect()
    }

    /// Aggregates sorted by descending count, ties by ascending name
    pub fn ranked(&self) -> Vec<StationAggregate> {
        let mut ranked = self.to_aggregates();
        // Stable sort keeps the ascending-name order among equal counts
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// Station with the highest count
    ///
    /// Ties resolve to the station whose name sorts first.
    pub fn busiest(&self) -> Option<StationAggregate> {
        let mut best: Option<(&str, usize)> = None;
        for (name, count) in self.iter() {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((name, count));
            }
        }

        best.map(|(station_name, count)| StationAggregate {
            station_name: station_name.to_string(),
            count,
        })
    }

    /// Smallest and largest station count
    pub fn range(&self) -> Option<(usize, usize)> {
        let min = self.counts.values().min()?;
        let max = self.counts.values().max()?;
        Some((*min, *max))
    }
}

/// Count records per station name
///
/// Empty input yields an empty mapping.
pub fn aggregate<'a, I>(records: I) -> StationCounts
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut result = StationCounts::default();

    for record in records {
        match record.station() {
            Some(name) => *result.counts.entry(name.to_string()).or_insert(0) += 1,
            None => result.unattributed += 1,
        }
    }

    result
}

/// Display location per station
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationLocations {
    locations: BTreeMap<String, GeoPoint>,
}

impl StationLocations {
    pub fn get(&self, station_name: &str) -> Option<GeoPoint> {
        self.locations.get(station_name).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Resolve each station to the first record with valid coordinates
pub fn locate<'a, I>(records: I) -> StationLocations
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut locations = BTreeMap::new();

    for record in records {
        if let (Some(name), Some(point)) = (record.station(), record.location()) {
            locations.entry(name.to_string()).or_insert(point);
        }
    }

    StationLocations { locations }
}
