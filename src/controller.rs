//! Interaction controller for map selections.
//!
//! A two-state machine (`Unfiltered`, `Filtered(station)`) driven by
//! selection events. Each handled event updates the session's
//! [`SelectionState`], reruns the filter and the projector, and returns a
//! [`ViewUpdate`] for the presentation layer.

use crate::error::Result;
use crate::filter;
use crate::models::{DerivedStatistics, MapFigure};
use crate::projector::MapProjector;
use crate::selection::SelectionState;
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Selection event as sent by the presentation layer
///
/// `{"selectedStation": "Gare A"}` selects a station; `null` or a missing
/// field clears the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    #[serde(default)]
    pub selected_station: Option<String>,
}

impl ClickEvent {
    /// Parse one JSON event
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// Controller input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A station point was clicked
    Select(String),
    /// Empty map area clicked, or an explicit reset
    Clear,
}

impl From<ClickEvent> for SelectionEvent {
    fn from(event: ClickEvent) -> Self {
        match event.selected_station {
            Some(station) => SelectionEvent::Select(station),
            None => SelectionEvent::Clear,
        }
    }
}

/// Controller state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "station", rename_all = "camelCase")]
pub enum ViewState {
    #[default]
    Unfiltered,
    Filtered(String),
}

impl ViewState {
    /// Selected station, if any
    pub fn station(&self) -> Option<&str> {
        match self {
            ViewState::Unfiltered => None,
            ViewState::Filtered(station) => Some(station.as_str()),
        }
    }
}

impl From<&SelectionState> for ViewState {
    fn from(selection: &SelectionState) -> Self {
        match selection.get() {
            Some(station) => ViewState::Filtered(station.to_string()),
            None => ViewState::Unfiltered,
        }
    }
}

/// Next state for an event
///
/// Every state accepts every event, so there is no terminal state.
pub fn transition(_state: &ViewState, event: &SelectionEvent) -> ViewState {
    match event {
        SelectionEvent::Select(station) => ViewState::Filtered(station.clone()),
        SelectionEvent::Clear => ViewState::Unfiltered,
    }
}

/// Output of one recomputation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewUpdate {
    pub state: ViewState,
    pub statistics: DerivedStatistics,
    pub figure: MapFigure,
}

/// Per-session controller over a shared record store
#[derive(Debug, Clone)]
pub struct InteractionController {
    store: Arc<RecordStore>,
    projector: MapProjector,
    selection: SelectionState,
}

impl InteractionController {
    /// Create a controller in the `Unfiltered` state
    pub fn new(store: Arc<RecordStore>, projector: MapProjector) -> Self {
        Self {
            store,
            projector,
            selection: SelectionState::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        ViewState::from(&self.selection)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Apply an event and recompute the view
    pub fn handle(&mut self, event: SelectionEvent) -> ViewUpdate {
        let previous = self.state();
        let next = transition(&previous, &event);
        debug!("Selection transition: {:?} -> {:?}", previous, next);

        self.selection.set(next.station().map(str::to_string));
        self.render()
    }

    /// Parse and apply a JSON click event
    pub fn handle_json(&mut self, input: &str) -> Result<ViewUpdate> {
        let event = ClickEvent::from_json(input)?;
        Ok(self.handle(event.into()))
    }

    /// Recompute the view for the current state
    pub fn render(&self) -> ViewUpdate {
        let store = self.store.as_ref();
        let outcome = filter::filter(store.records(), self.selection.get());

        // The base aggregate already covers the unfiltered view
        let figure = if self.selection.is_active() {
            self.projector.project(&outcome.subset)
        } else {
            self.projector
                .project_aggregate(store.base_counts(), store.locations())
        };

        ViewUpdate {
            state: self.state(),
            statistics: outcome.stats,
            figure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn controller() -> InteractionController {
        let store = RecordStore::new(vec![
            Record::new("Gare A", "bag").with_coordinates(48.84, 2.37),
            Record::new("Gare A", "phone").with_coordinates(48.84, 2.37),
            Record::new("Gare B", "bag").with_coordinates(45.76, 4.86),
        ]);
        InteractionController::new(Arc::new(store), MapProjector::default())
    }

    #[test]
    fn test_transition_table() {
        let select_a = SelectionEvent::Select("A".to_string());
        let select_b = SelectionEvent::Select("B".to_string());

        assert_eq!(
            transition(&ViewState::Unfiltered, &select_a),
            ViewState::Filtered("A".to_string())
        );
        assert_eq!(
            transition(&ViewState::Filtered("A".to_string()), &select_b),
            ViewState::Filtered("B".to_string())
        );
        assert_eq!(
            transition(&ViewState::Filtered("A".to_string()), &SelectionEvent::Clear),
            ViewState::Unfiltered
        );
        assert_eq!(
            transition(&ViewState::Unfiltered, &SelectionEvent::Clear),
            ViewState::Unfiltered
        );
    }

    #[test]
    fn test_click_event_conversion() {
        let event = ClickEvent::from_json(r#"{"selectedStation": "Gare A"}"#).unwrap();
        assert_eq!(
            SelectionEvent::from(event),
            SelectionEvent::Select("Gare A".to_string())
        );

        let event = ClickEvent::from_json(r#"{"selectedStation": null}"#).unwrap();
        assert_eq!(SelectionEvent::from(event), SelectionEvent::Clear);

        let event = ClickEvent::from_json("{}").unwrap();
        assert_eq!(SelectionEvent::from(event), SelectionEvent::Clear);

        assert!(ClickEvent::from_json("not json").is_err());
    }

    #[test]
    fn test_initial_render_is_unfiltered() {
        let update = controller().render();
        assert_eq!(update.state, ViewState::Unfiltered);
        assert_eq!(update.statistics.record_count, 3);
        assert_eq!(update.figure.points.len(), 2);
    }

    #[test]
    fn test_select_then_clear() {
        let mut controller = controller();

        let update = controller.handle(SelectionEvent::Select("Gare B".to_string()));
        assert_eq!(update.state, ViewState::Filtered("Gare B".to_string()));
        assert_eq!(update.statistics.record_count, 1);
        assert_eq!(update.figure.points.len(), 1);
        assert_eq!(update.figure.points[0].label, "Gare B");
        assert_eq!(controller.selection().get(), Some("Gare B"));

        let update = controller.handle(SelectionEvent::Clear);
        assert_eq!(update.state, ViewState::Unfiltered);
        assert_eq!(update.statistics.record_count, 3);
        assert_eq!(controller.selection().get(), None);
    }

    #[test]
    fn test_unknown_station_is_empty_not_error() {
        let mut controller = controller();
        let update = controller
            .handle_json(r#"{"selectedStation": "Gare Z"}"#)
            .unwrap();

        assert_eq!(update.state, ViewState::Filtered("Gare Z".to_string()));
        assert_eq!(update.statistics.record_count, 0);
        assert_eq!(update.statistics.busiest_station, None);
        assert!(update.figure.points.is_empty());
    }

    #[test]
    fn test_view_update_serializes_state() {
        let mut controller = controller();
        let update = controller.handle(SelectionEvent::Select("Gare A".to_string()));
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["state"]["mode"], "filtered");
        assert_eq!(json["state"]["station"], "Gare A");
        assert_eq!(json["statistics"]["recordCount"], 2);
        assert_eq!(json["figure"]["points"][0]["label"], "Gare A");
    }

    #[test]
    fn test_sessions_do_not_share_selection() {
        let first = controller();
        let store = Arc::new(first.store().clone());
        let mut a = InteractionController::new(store.clone(), MapProjector::default());
        let b = InteractionController::new(store, MapProjector::default());

        a.handle(SelectionEvent::Select("Gare A".to_string()));
        assert_eq!(a.state(), ViewState::Filtered("Gare A".to_string()));
        assert_eq!(b.state(), ViewState::Unfiltered);
    }
}
