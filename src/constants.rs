//! Column names and presentation defaults.
//!
//! Column names follow the SNCF "objets trouvés - restitution" export, which
//! flattens its JSON records into dotted `fields.*` headers.

/// Default column names in the lost-and-found export
pub mod columns {
    /// Origin station of the lost item
    pub const STATION_NAME: &str = "fields.gc_obo_gare_origine_r_name";
    /// Item category
    pub const ITEM_TYPE: &str = "fields.gc_obo_type_c";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    /// Date the item was found and logged
    pub const RECORDED_AT: &str = "fields.date";
}

/// Map presentation defaults
pub mod map {
    /// Zoom level that frames metropolitan France
    pub const DEFAULT_ZOOM: f64 = 3.0;
    /// Figure height in pixels
    pub const DEFAULT_HEIGHT: u32 = 600;
    /// Marker diameter bounds in pixels
    pub const MIN_MARKER_SIZE: f64 = 4.0;
    pub const MAX_MARKER_SIZE: f64 = 40.0;
}

/// Field separator used when none is configured
pub const DEFAULT_SEPARATOR: u8 = b',';

/// Environment variable consulted for the dataset path
pub const DATASET_ENV_VAR: &str = "LOSTFOUND_DATASET";

/// Accepted naive timestamp layouts, tried in order after RFC 3339
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layout, interpreted as midnight
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns_are_distinct() {
        let names = [
            columns::STATION_NAME,
            columns::ITEM_TYPE,
            columns::LATITUDE,
            columns::LONGITUDE,
            columns::RECORDED_AT,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_marker_bounds_ordered() {
        assert!(map::MIN_MARKER_SIZE < map::MAX_MARKER_SIZE);
    }
}
