//! Core data structures shared by the aggregation, filtering and projection
//! stages.
//!
//! Presentation-facing types serialize to camelCase JSON so a front end can
//! consume them directly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One lost-and-found entry
///
/// Every field is optional because the export contains blank and malformed
/// cells. A record without a station name still counts towards record totals
/// but never joins a station aggregate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub station_name: Option<String>,
    pub item_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Wall-clock time as written in the source
    pub recorded_at: Option<NaiveDateTime>,
}

impl Record {
    /// Create a record attributed to a station
    pub fn new(station_name: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            station_name: Some(station_name.into()),
            item_type: Some(item_type.into()),
            ..Default::default()
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_recorded_at(mut self, recorded_at: NaiveDateTime) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Station key, if the record has one
    pub fn station(&self) -> Option<&str> {
        self.station_name.as_deref()
    }

    /// Coordinates when both halves parsed
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Calendar date of the record timestamp
    pub fn recorded_on(&self) -> Option<NaiveDate> {
        self.recorded_at.map(|ts| ts.date())
    }
}

/// Number of records attributed to one station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationAggregate {
    pub station_name: String,
    pub count: usize,
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Summary statistics over the active subset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStatistics {
    pub record_count: usize,
    pub unique_station_count: usize,
    pub unique_item_type_count: usize,
    pub earliest_record_date: Option<NaiveDate>,
    pub busiest_station: Option<StationAggregate>,
    /// Records in the subset that carry no station name
    pub records_without_station: usize,
    /// Records in the subset whose timestamp was blank or unparseable
    pub records_without_timestamp: usize,
}

impl DerivedStatistics {
    /// Check whether the subset was empty
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// The renderable unit for one station on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointEncoding {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    /// Station count in the projected context
    pub size_value: f64,
    /// Value keyed to the color scale, also the station count
    pub color_value: f64,
    /// Marker diameter in pixels
    pub marker_size: f64,
    /// Resolved `#rrggbb` color
    pub color: String,
}

/// Points plus the viewport needed to draw them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFigure {
    pub points: Vec<PointEncoding>,
    /// Midpoint of the points' bounding box
    pub center: Option<GeoPoint>,
    pub zoom: f64,
    pub height: u32,
    /// Minimum and maximum count mapped onto the color scale
    pub color_domain: Option<(usize, usize)>,
    /// Stations that had records but no valid coordinates
    pub unplaced_stations: usize,
}

/// Field-level anomalies found while loading the dataset
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub total_rows: usize,
    pub missing_station: usize,
    pub missing_item_type: usize,
    pub invalid_coordinates: usize,
    pub invalid_timestamp: usize,
}

impl LoadReport {
    /// Total number of anomalous fields
    pub fn anomaly_count(&self) -> usize {
        self.missing_station
            + self.missing_item_type
            + self.invalid_coordinates
            + self.invalid_timestamp
    }

    pub fn is_clean(&self) -> bool {
        self.anomaly_count() == 0
    }
}
