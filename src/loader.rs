//! Dataset ingestion from a delimited export.
//!
//! Reads the whole file with the polars CSV reader, every column as a string,
//! then maps the configured columns onto [`Record`] fields. Structural
//! problems (missing file, unreadable CSV, absent column) abort loading.
//! Field-level problems are counted in a [`LoadReport`] unless strict mode
//! is enabled.

use crate::config::DatasetConfig;
use crate::constants::{DATE_FORMAT, TIMESTAMP_FORMATS};
use crate::error::{ExplorerError, Result};
use crate::models::{LoadReport, Record};
use crate::store::RecordStore;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{CsvParseOptions, CsvReadOptions, DataFrame, SerReader, StringChunked};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Load the configured dataset into a record store
pub fn load_dataset(config: &DatasetConfig) -> Result<RecordStore> {
    let start_time = Instant::now();
    let path = config.path.as_path();

    if !path.exists() {
        return Err(ExplorerError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let frame = read_frame(path, config.separator)?;
    debug!(
        "Read {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );

    let (records, report) = records_from_frame(&frame, config)?;
    let store = RecordStore::with_report(records, report);

    if !store.load_report().is_clean() {
        let report = store.load_report();
        warn!(
            "Dataset anomalies: {} without station, {} without item type, {} invalid coordinates, {} invalid timestamps",
            report.missing_station,
            report.missing_item_type,
            report.invalid_coordinates,
            report.invalid_timestamp
        );
    }

    info!(
        "Loaded {} records across {} stations from {} in {}ms",
        store.len(),
        store.base_counts().len(),
        path.display(),
        start_time.elapsed().as_millis()
    );

    Ok(store)
}

/// Read the file with every column typed as a string
fn read_frame(path: &Path, separator: u8) -> Result<DataFrame> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(frame)
}

fn string_column<'a>(
    frame: &'a DataFrame,
    name: &str,
    path: &Path,
) -> Result<&'a StringChunked> {
    let column = frame
        .column(name)
        .map_err(|_| ExplorerError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })?;

    Ok(column.as_materialized_series().str()?)
}

/// Convert a string-typed frame into records
pub fn records_from_frame(
    frame: &DataFrame,
    config: &DatasetConfig,
) -> Result<(Vec<Record>, LoadReport)> {
    let path = config.path.as_path();
    let columns = &config.columns;

    let stations = string_column(frame, &columns.station_name, path)?;
    let item_types = string_column(frame, &columns.item_type, path)?;
    let latitudes = string_column(frame, &columns.latitude, path)?;
    let longitudes = string_column(frame, &columns.longitude, path)?;
    let timestamps = string_column(frame, &columns.recorded_at, path)?;

    let mut parser = RowParser::new(config, frame.height());
    let mut records = Vec::with_capacity(frame.height());

    for row in 0..frame.height() {
        let record = parser.parse_row(
            row,
            stations.get(row),
            item_types.get(row),
            latitudes.get(row),
            longitudes.get(row),
            timestamps.get(row),
        )?;
        records.push(record);
    }

    Ok((records, parser.report))
}

/// Row-by-row field conversion with anomaly accounting
struct RowParser<'a> {
    config: &'a DatasetConfig,
    report: LoadReport,
}

impl<'a> RowParser<'a> {
    fn new(config: &'a DatasetConfig, total_rows: usize) -> Self {
        Self {
            config,
            report: LoadReport {
                total_rows,
                ..Default::default()
            },
        }
    }

    fn parse_row(
        &mut self,
        row: usize,
        station: Option<&str>,
        item_type: Option<&str>,
        latitude: Option<&str>,
        longitude: Option<&str>,
        timestamp: Option<&str>,
    ) -> Result<Record> {
        let config = self.config;
        let columns = &config.columns;

        let station_name = non_blank(station);
        if station_name.is_none() {
            self.report.missing_station += 1;
            self.reject(row, &columns.station_name, "station name is blank")?;
        }

        let item_type = non_blank(item_type);
        if item_type.is_none() {
            self.report.missing_item_type += 1;
            self.reject(row, &columns.item_type, "item type is blank")?;
        }

        let lat = latitude.and_then(|value| parse_coordinate(value, 90.0));
        let lon = longitude.and_then(|value| parse_coordinate(value, 180.0));
        let (latitude, longitude) = match (lat, lon) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => {
                self.report.invalid_coordinates += 1;
                let column = if lat.is_none() {
                    &columns.latitude
                } else {
                    &columns.longitude
                };
                self.reject(
                    row,
                    column,
                    format!("invalid coordinates {:?},{:?}", latitude, longitude),
                )?;
                (None, None)
            }
        };

        let recorded_at = timestamp.and_then(parse_timestamp);
        if recorded_at.is_none() {
            self.report.invalid_timestamp += 1;
            self.reject(
                row,
                &columns.recorded_at,
                format!("unparseable timestamp {:?}", timestamp),
            )?;
        }

        Ok(Record {
            station_name,
            item_type,
            latitude,
            longitude,
            recorded_at,
        })
    }

    /// Fail in strict mode, otherwise keep going
    fn reject(&self, row: usize, column: &str, reason: impl Into<String>) -> Result<()> {
        if self.config.strict_fields {
            return Err(ExplorerError::MalformedField {
                path: self.config.path.clone(),
                row: row + 1,
                column: column.to_string(),
                reason: reason.into(),
            });
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a decimal-degree coordinate within `[-limit, limit]`
///
/// Accepts a decimal comma when the value has no dot, as found in
/// semicolon-separated French exports.
pub fn parse_coordinate(value: &str, limit: f64) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = if value.contains(',') && !value.contains('.') {
        value.replace(',', ".").parse::<f64>().ok()
    } else {
        value.parse::<f64>().ok()
    };

    parsed.filter(|v| v.is_finite() && v.abs() <= limit)
}

/// Parse an ISO-like timestamp into wall-clock time
///
/// Offsets are dropped rather than converted, so the calendar date matches
/// what the source wrote.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_local());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
