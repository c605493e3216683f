use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{Settings, DOT_SIZE_RANGE};
use crate::data::dashboard::{build_dashboard, Dashboard};
use crate::data::filter::FilterState;
use crate::data::model::{Dataset, DaySelection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Day + neighborhood selection.
    pub filters: FilterState,

    /// Slider value; the map radius is this times `settings.dot_scale`.
    pub dot_size: u32,

    /// Panels for the current filter, rebuilt on every change.
    pub dashboard: Option<Dashboard>,

    /// Set when the map should jump to the dashboard's centre.
    pub recenter_map: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            dot_size: settings.default_dot_size,
            settings,
            dataset: None,
            filters: FilterState::default(),
            dashboard: None,
            recenter_map: false,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and select every neighborhood.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        if dataset.is_empty() {
            log::warn!("Loaded table has no rows");
        }
        let day = self.filters.day;
        self.filters = FilterState::select_all(&dataset);
        self.filters.day = day;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Load a file and make it the current dataset. The previous dataset is
    /// kept when loading fails.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let dataset = crate::data::loader::load_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        self.set_dataset(dataset);
        Ok(())
    }

    /// Recompute the dashboard after a filter or display change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let view = self.settings.view_options(self.dot_size);
            self.dashboard = Some(build_dashboard(ds, &self.filters, &view));
            self.recenter_map = true;
        }
    }

    pub fn set_day(&mut self, day: DaySelection) {
        if self.filters.day != day {
            self.filters.day = day;
            self.refilter();
        }
    }

    pub fn set_dot_size(&mut self, dot_size: u32) {
        let dot_size = dot_size.clamp(*DOT_SIZE_RANGE.start(), *DOT_SIZE_RANGE.end());
        if self.dot_size != dot_size {
            self.dot_size = dot_size;
            self.refilter();
        }
    }

    /// Toggle a single neighborhood in the selection.
    pub fn toggle_neighborhood(&mut self, name: &str) {
        if !self.filters.neighborhoods.remove(name) {
            self.filters.neighborhoods.insert(name.to_string());
        }
        self.refilter();
    }

    /// Select every neighborhood.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.neighborhoods = ds.neighborhoods.clone();
            self.refilter();
        }
    }

    /// Deselect every neighborhood (the dashboard falls back to all records).
    pub fn select_none(&mut self) {
        self.filters.neighborhoods.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dashboard::Panel;
    use crate::data::model::ScheduleCode;
    use crate::data::test_support::record;

    fn loaded() -> AppState {
        let mut state = AppState::new(Settings::default());
        state.set_dataset(Dataset::from_records(vec![
            record("Back Bay", "M"),
            record("Back Bay", "T"),
            record("South End", "M"),
        ]));
        state
    }

    #[test]
    fn test_loading_selects_every_neighborhood() {
        let state = loaded();
        assert_eq!(state.filters.neighborhoods.len(), 2);
        assert_eq!(state.dashboard.as_ref().unwrap().visible_records, 3);
    }

    #[test]
    fn test_day_change_rebuilds_dashboard() {
        let mut state = loaded();
        state.set_day(DaySelection::Tuesday);
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.visible_records, 1);
        assert_eq!(dash.most_common, Panel::Ready(ScheduleCode::T));
    }

    #[test]
    fn test_toggle_and_select_none() {
        let mut state = loaded();
        state.toggle_neighborhood("South End");
        assert_eq!(state.dashboard.as_ref().unwrap().visible_records, 2);
        state.toggle_neighborhood("South End");
        assert_eq!(state.dashboard.as_ref().unwrap().visible_records, 3);

        state.set_day(DaySelection::Monday);
        state.select_none();
        assert_eq!(state.dashboard.as_ref().unwrap().visible_records, 3);
        state.select_all();
        assert_eq!(state.dashboard.as_ref().unwrap().visible_records, 2);
    }

    #[test]
    fn test_dot_size_is_clamped_and_scaled() {
        let mut state = loaded();
        state.set_dot_size(50);
        assert_eq!(state.dot_size, 20);
        let map = state.dashboard.as_ref().unwrap().map.ready().unwrap();
        assert_eq!(map.radius, 100.0);
    }

    #[test]
    fn test_failed_open_keeps_previous_dataset() {
        let mut state = loaded();
        assert!(state.open(Path::new("/nonexistent/schedule.csv")).is_err());
        assert_eq!(state.dataset.as_ref().unwrap().len(), 3);
    }
}
