//! Immutable in-memory record store.
//!
//! Holds the loaded records together with the base station aggregate and
//! station locations, all computed once at construction.

use crate::aggregator::{self, StationCounts, StationLocations};
use crate::models::{LoadReport, Record};

/// Read-only dataset shared by every session
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    base_counts: StationCounts,
    locations: StationLocations,
    report: LoadReport,
}

impl RecordStore {
    /// Build a store from already-materialized records
    pub fn new(records: Vec<Record>) -> Self {
        let report = LoadReport {
            total_rows: records.len(),
            missing_station: records.iter().filter(|r| r.station().is_none()).count(),
            missing_item_type: records.iter().filter(|r| r.item_type.is_none()).count(),
            invalid_coordinates: records.iter().filter(|r| r.location().is_none()).count(),
            invalid_timestamp: records.iter().filter(|r| r.recorded_at.is_none()).count(),
        };
        Self::with_report(records, report)
    }

    /// Build a store and keep the loader's anomaly report
    pub fn with_report(records: Vec<Record>, report: LoadReport) -> Self {
        let base_counts = aggregator::aggregate(&records);
        let locations = aggregator::locate(&records);

        Self {
            records,
            base_counts,
            locations,
            report,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-station counts over the full dataset
    pub fn base_counts(&self) -> &StationCounts {
        &self.base_counts
    }

    pub fn locations(&self) -> &StationLocations {
        &self.locations
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Base count of the station a record belongs to
    pub fn station_count(&self, record: &Record) -> Option<usize> {
        record
            .station()
            .and_then(|name| self.base_counts.get(name))
    }

    /// Records joined with their station's base count
    pub fn enriched(&self) -> impl Iterator<Item = (&Record, Option<usize>)> + '_ {
        self.records
            .iter()
            .map(move |record| (record, self.station_count(record)))
    }
}
