//! Configuration management and validation.
//!
//! Provides the dataset ingestion settings (file location, separator, column
//! mapping) and the map presentation settings consumed by the projector.

use crate::constants::{self, columns, map};
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    pub dataset: DatasetConfig,
    pub map: MapConfig,
}

impl ExplorerConfig {
    /// Create configuration for a dataset path with default settings
    pub fn for_dataset(path: impl Into<PathBuf>) -> Self {
        Self {
            dataset: DatasetConfig {
                path: path.into(),
                ..Default::default()
            },
            map: MapConfig::default(),
        }
    }

    /// Set the field separator
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.dataset.separator = separator;
        self
    }

    /// Treat field-level anomalies as fatal
    pub fn with_strict_fields(mut self) -> Self {
        self.dataset.strict_fields = true;
        self
    }

    /// Override the column mapping
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.dataset.columns = columns;
        self
    }

    /// Configure the map color scale
    pub fn with_color_scale(mut self, color_scale: ColorScaleKind) -> Self {
        self.map.color_scale = color_scale;
        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.dataset.validate()?;
        self.map.validate()?;
        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

/// Where and how to read the lost-and-found export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the delimited file
    pub path: PathBuf,

    /// Field separator byte
    pub separator: u8,

    /// Header names for each record field
    pub columns: ColumnMapping,

    /// Abort loading on the first malformed field instead of counting it
    pub strict_fields: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("objets-trouves-restitution.csv"),
            separator: constants::DEFAULT_SEPARATOR,
            columns: ColumnMapping::default(),
            strict_fields: false,
        }
    }
}

impl DatasetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ExplorerError::configuration("Dataset path is empty"));
        }

        if !self.separator.is_ascii() || self.separator == b'"' || self.separator == b'\n' {
            return Err(ExplorerError::configuration(format!(
                "Unsupported field separator: {:?}",
                self.separator as char
            )));
        }

        self.columns.validate()
    }
}

/// Header names mapped onto record fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub station_name: String,
    pub item_type: String,
    pub latitude: String,
    pub longitude: String,
    pub recorded_at: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            station_name: columns::STATION_NAME.to_string(),
            item_type: columns::ITEM_TYPE.to_string(),
            latitude: columns::LATITUDE.to_string(),
            longitude: columns::LONGITUDE.to_string(),
            recorded_at: columns::RECORDED_AT.to_string(),
        }
    }
}

impl ColumnMapping {
    /// All configured header names in field order
    pub fn names(&self) -> [&str; 5] {
        [
            self.station_name.as_str(),
            self.item_type.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.recorded_at.as_str(),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let names = self.names();
        if let Some(blank) = names.iter().position(|name| name.trim().is_empty()) {
            return Err(ExplorerError::configuration(format!(
                "Column mapping entry {} is blank",
                blank
            )));
        }

        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(ExplorerError::configuration(format!(
                    "Column '{}' is mapped to more than one field",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Map presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Marker diameter for the smallest count
    pub min_marker_size: f64,

    /// Marker diameter for the largest count
    pub max_marker_size: f64,

    pub zoom: f64,

    /// Figure height in pixels
    pub height: u32,

    pub color_scale: ColorScaleKind,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_marker_size: map::MIN_MARKER_SIZE,
            max_marker_size: map::MAX_MARKER_SIZE,
            zoom: map::DEFAULT_ZOOM,
            height: map::DEFAULT_HEIGHT,
            color_scale: ColorScaleKind::Viridis,
        }
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_marker_size.is_finite() && self.max_marker_size.is_finite()) {
            return Err(ExplorerError::configuration("Marker sizes must be finite"));
        }
        if self.min_marker_size <= 0.0 || self.min_marker_size > self.max_marker_size {
            return Err(ExplorerError::configuration(format!(
                "Invalid marker size range: {}..{}",
                self.min_marker_size, self.max_marker_size
            )));
        }
        if !self.zoom.is_finite() || self.zoom < 0.0 {
            return Err(ExplorerError::configuration(format!(
                "Invalid zoom level: {}",
                self.zoom
            )));
        }
        if self.height == 0 {
            return Err(ExplorerError::configuration("Figure height must be positive"));
        }
        Ok(())
    }
}

/// Continuous color gradients available for count encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScaleKind {
    #[default]
    Viridis,
    Plasma,
    Reds,
}

impl std::str::FromStr for ColorScaleKind {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "viridis" => Ok(Self::Viridis),
            "plasma" => Ok(Self::Plasma),
            "reds" => Ok(Self::Reds),
            other => Err(ExplorerError::configuration(format!(
                "Unknown color scale: {}",
                other
            ))),
        }
    }
}
