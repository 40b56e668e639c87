//! Session-scoped station selection.

/// The currently selected station, absent meaning "all stations"
///
/// Any station name is accepted. A name that matches no record is a valid
/// selection that narrows to an empty subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_station: Option<String>,
}

impl SelectionState {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&str> {
        self.selected_station.as_deref()
    }

    pub fn set(&mut self, station: Option<String>) {
        self.selected_station = station;
    }

    /// Reset to "all stations"
    pub fn clear(&mut self) {
        self.selected_station = None;
    }

    pub fn is_active(&self) -> bool {
        self.selected_station.is_some()
    }
}
