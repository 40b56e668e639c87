//! Lost & Found Station Explorer Library
//!
//! Aggregates railway lost-and-found records by origin station and drives an
//! interactive station map: a point per station sized and colored by item
//! count, with summary statistics that follow the user's station selection.
//!
//! This library provides tools for:
//! - Loading the lost-and-found export into an immutable record store
//! - Counting records per station and resolving station locations
//! - Filtering by the selected station and deriving summary statistics
//! - Encoding stations as map points with a continuous color scale
//! - Driving selection changes through a small state machine
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lostfound_explorer::{InteractionController, MapProjector, Record, RecordStore, SelectionEvent};
//!
//! let store = RecordStore::new(vec![
//!     Record::new("Gare A", "bag").with_coordinates(48.84, 2.37),
//!     Record::new("Gare A", "phone").with_coordinates(48.84, 2.37),
//!     Record::new("Gare B", "bag").with_coordinates(45.76, 4.86),
//! ]);
//! let mut controller = InteractionController::new(Arc::new(store), MapProjector::default());
//!
//! let update = controller.handle(SelectionEvent::Select("Gare B".to_string()));
//! assert_eq!(update.statistics.record_count, 1);
//! assert_eq!(update.figure.points.len(), 1);
//! ```

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod projector;
pub mod selection;
pub mod store;

// Re-export commonly used types
pub use aggregator::{StationCounts, StationLocations, aggregate, locate};
pub use config::{ColorScaleKind, ColumnMapping, DatasetConfig, ExplorerConfig, MapConfig};
pub use controller::{ClickEvent, InteractionController, SelectionEvent, ViewState, ViewUpdate};
pub use error::{ExplorerError, Result};
pub use filter::{FilterOutcome, filter};
pub use loader::load_dataset;
pub use models::{
    DerivedStatistics, GeoPoint, LoadReport, MapFigure, PointEncoding, Record, StationAggregate,
};
pub use projector::{ColorScale, MapProjector};
pub use selection::SelectionState;
pub use store::RecordStore;
