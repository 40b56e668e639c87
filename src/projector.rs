//! Map encoding for station aggregates.
//!
//! Turns per-station counts into one [`PointEncoding`] per placed station:
//! position from the station's location, marker size by the square root of
//! the count share (so marker area tracks the count), and a color sampled
//! from a continuous gradient over the count range.

use crate::aggregator::{self, StationCounts, StationLocations};
use crate::config::{ColorScaleKind, MapConfig};
use crate::models::{GeoPoint, MapFigure, PointEncoding, Record};
use tracing::debug;

const VIRIDIS: &[[u8; 3]] = &[
    [0x44, 0x01, 0x54],
    [0x3b, 0x52, 0x8b],
    [0x21, 0x91, 0x8c],
    [0x5e, 0xc9, 0x62],
    [0xfd, 0xe7, 0x25],
];

const PLASMA: &[[u8; 3]] = &[
    [0x0d, 0x08, 0x87],
    [0x7e, 0x03, 0xa8],
    [0xcc, 0x47, 0x78],
    [0xf8, 0x95, 0x40],
    [0xf0, 0xf9, 0x21],
];

const REDS: &[[u8; 3]] = &[
    [0xff, 0xf5, 0xf0],
    [0xfc, 0xbb, 0xa1],
    [0xfb, 0x6a, 0x4a],
    [0xcb, 0x18, 0x1d],
    [0x67, 0x00, 0x0d],
];

/// Piecewise-linear gradient over evenly spaced stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    stops: &'static [[u8; 3]],
}

impl ColorScale {
    pub fn new(kind: ColorScaleKind) -> Self {
        let stops = match kind {
            ColorScaleKind::Viridis => VIRIDIS,
            ColorScaleKind::Plasma => PLASMA,
            ColorScaleKind::Reds => REDS,
        };
        Self { stops }
    }

    /// Sample the gradient at `t`, clamped to `[0, 1]`
    pub fn rgb_at(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        let position = t * last as f64;
        let lower = (position.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let frac = position - lower as f64;

        let a = self.stops[lower];
        let b = self.stops[upper];
        let mut rgb = [0u8; 3];
        for channel in 0..3 {
            let value = a[channel] as f64 + (b[channel] as f64 - a[channel] as f64) * frac;
            rgb[channel] = value.round() as u8;
        }
        rgb
    }

    /// Sample the gradient as a `#rrggbb` string
    pub fn hex_at(&self, t: f64) -> String {
        let [r, g, b] = self.rgb_at(t);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Projects aggregates onto map points
#[derive(Debug, Clone)]
pub struct MapProjector {
    config: MapConfig,
    scale: ColorScale,
}

impl Default for MapProjector {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

impl MapProjector {
    pub fn new(config: MapConfig) -> Self {
        let scale = ColorScale::new(config.color_scale);
        Self { config, scale }
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Project a record subset, aggregating it first
    pub fn project(&self, subset: &[&Record]) -> MapFigure {
        let counts = aggregator::aggregate(subset.iter().copied());
        let locations = aggregator::locate(subset.iter().copied());
        self.project_aggregate(&counts, &locations)
    }

    /// Project precomputed counts
    ///
    /// Stations without a known location are left off the map and counted
    /// in [`MapFigure::unplaced_stations`].
    pub fn project_aggregate(
        &self,
        counts: &StationCounts,
        locations: &StationLocations,
    ) -> MapFigure {
        let placed: Vec<(&str, usize, GeoPoint)> = counts
            .iter()
            .filter_map(|(name, count)| locations.get(name).map(|point| (name, count, point)))
            .collect();
        let unplaced_stations = counts.len() - placed.len();

        let color_domain = placed
            .iter()
            .map(|(_, count, _)| *count)
            .fold(None, |range: Option<(usize, usize)>, count| match range {
                None => Some((count, count)),
                Some((min, max)) => Some((min.min(count), max.max(count))),
            });

        let points = match color_domain {
            Some((min, max)) => placed
                .iter()
                .map(|(name, count, point)| self.encode(name, *count, *point, min, max))
                .collect(),
            None => Vec::new(),
        };

        debug!(
            "Projected {} stations ({} unplaced), color domain {:?}",
            counts.len(),
            unplaced_stations,
            color_domain
        );

        MapFigure {
            center: bounding_center(&points),
            points,
            zoom: self.config.zoom,
            height: self.config.height,
            color_domain,
            unplaced_stations,
        }
    }

    fn encode(
        &self,
        name: &str,
        count: usize,
        point: GeoPoint,
        min_count: usize,
        max_count: usize,
    ) -> PointEncoding {
        // Equal counts map to the top of the scale
        let t = if max_count > min_count {
            (count - min_count) as f64 / (max_count - min_count) as f64
        } else {
            1.0
        };

        let share = count as f64 / max_count.max(1) as f64;
        let marker_size = self.config.min_marker_size
            + (self.config.max_marker_size - self.config.min_marker_size) * share.sqrt();

        PointEncoding {
            latitude: point.latitude,
            longitude: point.longitude,
            label: name.to_string(),
            size_value: count as f64,
            color_value: count as f64,
            marker_size,
            color: self.scale.hex_at(t),
        }
    }
}

/// Midpoint of the points' bounding box
fn bounding_center(points: &[PointEncoding]) -> Option<GeoPoint> {
    let first = points.first()?;
    let mut bounds = (first.latitude, first.latitude, first.longitude, first.longitude);

    for point in &points[1..] {
        bounds.0 = bounds.0.min(point.latitude);
        bounds.1 = bounds.1.max(point.latitude);
        bounds.2 = bounds.2.min(point.longitude);
        bounds.3 = bounds.3.max(point.longitude);
    }

    Some(GeoPoint {
        latitude: (bounds.0 + bounds.1) / 2.0,
        longitude: (bounds.2 + bounds.3) / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new("Paris Nord", "bag").with_coordinates(48.880, 2.355),
            Record::new("Paris Nord", "phone").with_coordinates(48.880, 2.355),
            Record::new("Paris Nord", "keys").with_coordinates(48.880, 2.355),
            Record::new("Lille Flandres", "bag").with_coordinates(50.636, 3.070),
            Record::new("Arras", "bag").with_coordinates(50.287, 2.781),
            Record::new("Arras", "wallet"),
            Record::new("Nowhere", "bag"),
        ]
    }

    #[test]
    fn test_color_scale_endpoints() {
        let scale = ColorScale::new(ColorScaleKind::Viridis);
        assert_eq!(scale.hex_at(0.0), "#440154");
        assert_eq!(scale.hex_at(1.0), "#fde725");
        assert_eq!(scale.hex_at(0.5), "#21918c");
        assert_eq!(scale.hex_at(-3.0), "#440154");
        assert_eq!(scale.hex_at(7.0), "#fde725");
        assert_eq!(scale.hex_at(f64::NAN), "#440154");
    }

    #[test]
    fn test_color_scale_is_monotonic_in_lightness() {
        let scale = ColorScale::new(ColorScaleKind::Reds);
        let mut previous = u32::MAX;
        for step in 0..=20 {
            let [r, g, b] = scale.rgb_at(step as f64 / 20.0);
            let lightness = r as u32 + g as u32 + b as u32;
            assert!(lightness <= previous);
            previous = lightness;
        }
    }

    #[test]
    fn test_one_point_per_placed_station() {
        let records = sample_records();
        let subset: Vec<&Record> = records.iter().collect();
        let figure = MapProjector::default().project(&subset);

        let labels: Vec<&str> = figure.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Arras", "Lille Flandres", "Paris Nord"]);
        assert_eq!(figure.unplaced_stations, 1);
        assert_eq!(figure.color_domain, Some((1, 3)));

        let arras = &figure.points[0];
        assert_eq!(arras.size_value, 2.0);
        assert_eq!(arras.color_value, 2.0);
        assert_eq!(arras.latitude, 50.287);
    }

    #[test]
    fn test_size_and_color_follow_count() {
        let records = sample_records();
        let subset: Vec<&Record> = records.iter().collect();
        let figure = MapProjector::default().project(&subset);

        let paris = figure.points.iter().find(|p| p.label == "Paris Nord").unwrap();
        let lille = figure
            .points
            .iter()
            .find(|p| p.label == "Lille Flandres")
            .unwrap();

        assert_eq!(paris.marker_size, 40.0);
        assert!(lille.marker_size < paris.marker_size);
        assert_eq!(paris.color, "#fde725");
        assert_eq!(lille.color, "#440154");
    }

    #[test]
    fn test_uniform_counts_use_top_of_scale() {
        let records = vec![
            Record::new("Brest", "bag").with_coordinates(48.388, -4.479),
            Record::new("Morlaix", "bag").with_coordinates(48.578, -3.832),
        ];
        let subset: Vec<&Record> = records.iter().collect();
        let figure = MapProjector::default().project(&subset);

        assert!(figure.points.iter().all(|p| p.color == "#fde725"));
    }

    #[test]
    fn test_projection_is_stable() {
        let records = sample_records();
        let subset: Vec<&Record> = records.iter().collect();
        let projector = MapProjector::default();
        assert_eq!(projector.project(&subset), projector.project(&subset));
    }

    #[test]
    fn test_viewport_center_and_defaults() {
        let records = sample_records();
        let subset: Vec<&Record> = records.iter().collect();
        let figure = MapProjector::default().project(&subset);

        let center = figure.center.unwrap();
        assert!((center.latitude - (48.880 + 50.636) / 2.0).abs() < 1e-9);
        assert!((center.longitude - (2.355 + 3.070) / 2.0).abs() < 1e-9);
        assert_eq!(figure.zoom, 3.0);
        assert_eq!(figure.height, 600);
    }

    #[test]
    fn test_empty_subset_projects_empty_figure() {
        let figure = MapProjector::default().project(&[]);
        assert!(figure.points.is_empty());
        assert_eq!(figure.center, None);
        assert_eq!(figure.color_domain, None);
        assert_eq!(figure.unplaced_stations, 0);
    }

    #[test]
    fn test_project_aggregate_matches_project() {
        let records = sample_records();
        let subset: Vec<&Record> = records.iter().collect();
        let projector = MapProjector::new(MapConfig {
            color_scale: ColorScaleKind::Plasma,
            ..Default::default()
        });

        let counts = aggregator::aggregate(&records);
        let locations = aggregator::locate(&records);
        assert_eq!(
            projector.project_aggregate(&counts, &locations),
            projector.project(&subset)
        );
    }
}
