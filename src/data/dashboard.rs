use serde::Serialize;

use super::aggregate::{
    category_shares, cross_tabulate, map_center, most_common_code, CategoryColumn, CrossTab,
    Proportions,
};
use super::error::NoData;
use super::filter::{filtered_indices, FilterState};
use super::model::{Dataset, DaySelection, Record, ScheduleCode};

// ---------------------------------------------------------------------------
// Panel – one guarded slot of the dashboard
// ---------------------------------------------------------------------------

/// Either a ready render spec or an explicit "no data" placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "spec", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    NoData,
}

impl<T> Panel<T> {
    fn guard(name: &str, result: Result<T, NoData>) -> Self {
        match result {
            Ok(spec) => Panel::Ready(spec),
            Err(NoData) => {
                log::debug!("{name}: no data for the current filter");
                Panel::NoData
            }
        }
    }

    #[cfg(test)]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(spec) => Some(spec),
            Panel::NoData => None,
        }
    }

    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }
}

// ---------------------------------------------------------------------------
// Render specs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
    pub code: Option<ScheduleCode>,
    /// `None` for codes outside the colour table; renderers skip these.
    pub color: Option<[u8; 3]>,
}

/// Scatter map of the active subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub points: Vec<MapPoint>,
    /// Dot radius in metres.
    pub radius: f64,
    pub center: [f64; 2],
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub code: ScheduleCode,
    pub color: [u8; 3],
    /// One value per category, aligned with [`StackedBarSpec::categories`].
    pub values: Vec<u32>,
}

/// Neighborhoods on the category axis, one stacked series per code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBarSpec {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl From<CrossTab> for StackedBarSpec {
    fn from(table: CrossTab) -> Self {
        let categories: Vec<String> = table.rows.keys().cloned().collect();
        let series = ScheduleCode::ALL
            .into_iter()
            .map(|code| BarSeries {
                code,
                color: code.rgb(),
                values: table.rows.values().map(|row| row[code.index()]).collect(),
            })
            .collect();
        StackedBarSpec {
            title: "Area and Day Combo Frequency".to_string(),
            categories,
            series,
        }
    }
}

/// Labels + counts for a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionSpec {
    pub title: String,
    #[serde(flatten)]
    pub shares: Proportions,
}

/// Projection of a record for the data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub full_address: String,
    pub mailing_neighborhood: String,
    pub zip_code: String,
    pub recollect: String,
    pub trashday: String,
}

impl From<&Record> for TableRow {
    fn from(rec: &Record) -> Self {
        TableRow {
            full_address: rec.full_address.clone(),
            mailing_neighborhood: rec.mailing_neighborhood.clone(),
            zip_code: rec.zip_code.clone(),
            recollect: rec.recollect.clone().unwrap_or_default(),
            trashday: rec.trashday.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Display knobs that are not part of the filter itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub dot_radius: f64,
    pub zoom: f64,
    pub other_threshold: f64,
}

/// Everything the renderers need for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub day: DaySelection,
    pub neighborhoods_selected: usize,
    pub total_records: usize,
    pub visible_records: usize,
    pub most_common: Panel<ScheduleCode>,
    pub map: Panel<MapSpec>,
    pub day_mix: Panel<StackedBarSpec>,
    pub districts: Panel<ProportionSpec>,
    pub recollections: Panel<ProportionSpec>,
    pub table: Vec<TableRow>,
}

/// Filter `dataset` and compute every panel from scratch.
///
/// Each aggregation is guarded on its own: an empty subset turns into
/// [`Panel::NoData`] for that panel without affecting the others.
pub fn build_dashboard(dataset: &Dataset, filters: &FilterState, view: &ViewOptions) -> Dashboard {
    let active: Vec<&Record> = filtered_indices(dataset, filters)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect();

    log::debug!(
        "Rebuilding dashboard: day={}, {} neighborhoods, {}/{} records visible",
        filters.day,
        filters.neighborhoods.len(),
        active.len(),
        dataset.len()
    );

    let most_common = Panel::guard("most common code", most_common_code(&active));

    let map = Panel::guard("map", {
        let center = if filters.is_fallback() {
            map_center(dataset.records.iter().map(|r| (r.x_coord, r.y_coord)))
        } else {
            map_center(active.iter().map(|r| (r.x_coord, r.y_coord)))
        };
        center.map(|center| MapSpec {
            points: active
                .iter()
                .map(|r| MapPoint {
                    x: r.x_coord,
                    y: r.y_coord,
                    code: r.schedule,
                    color: r.color,
                })
                .collect(),
            radius: view.dot_radius,
            center,
            zoom: view.zoom,
        })
    });

    let day_mix = Panel::guard(
        "neighborhood day mix",
        cross_tabulate(&active).map(StackedBarSpec::from),
    );

    let proportion = |column: CategoryColumn| {
        Panel::guard(
            column.title(),
            category_shares(&active, column, view.other_threshold).map(|shares| ProportionSpec {
                title: column.title().to_string(),
                shares,
            }),
        )
    };
    let districts = proportion(CategoryColumn::PwdDistrict);
    let recollections = proportion(CategoryColumn::Recollect);

    Dashboard {
        day: filters.day,
        neighborhoods_selected: filters.neighborhoods.len(),
        total_records: dataset.len(),
        visible_records: active.len(),
        most_common,
        map,
        day_mix,
        districts,
        recollections,
        table: active.iter().map(|r| TableRow::from(*r)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::test_support::record;

    const VIEW: ViewOptions = ViewOptions {
        dot_radius: 35.0,
        zoom: 10.0,
        other_threshold: 0.05,
    };

    fn three_records() -> Dataset {
        Dataset::from_records(vec![
            record("Back Bay", "M"),
            record("Back Bay", "T"),
            record("South End", "M"),
        ])
    }

    #[test]
    fn test_monday_across_all_neighborhoods() {
        let ds = three_records();
        let filters = FilterState {
            day: DaySelection::Monday,
            neighborhoods: ds.neighborhoods.clone(),
        };
        let dash = build_dashboard(&ds, &filters, &VIEW);

        assert_eq!(dash.visible_records, 2);
        assert_eq!(dash.table[0].mailing_neighborhood, "Back Bay");
        assert_eq!(dash.table[1].mailing_neighborhood, "South End");
        assert_eq!(dash.most_common, Panel::Ready(ScheduleCode::M));

        let bars = dash.day_mix.ready().unwrap();
        assert_eq!(bars.categories, ["Back Bay", "South End"]);
        assert_eq!(bars.series.len(), 8);
        for series in &bars.series {
            let expected = if series.code == ScheduleCode::M { 1 } else { 0 };
            assert_eq!(series.values, [expected, expected]);
        }
    }

    #[test]
    fn test_map_spec_carries_radius_zoom_and_center() {
        let mut recs = vec![record("Back Bay", "M"), record("Back Bay", "TH")];
        recs[0].x_coord = -71.2;
        recs[0].y_coord = 42.2;
        recs[1].x_coord = -71.0;
        recs[1].y_coord = 42.4;
        let ds = Dataset::from_records(recs);

        let dash = build_dashboard(&ds, &FilterState::select_all(&ds), &VIEW);
        let map = dash.map.ready().unwrap();
        assert_eq!(map.points.len(), 2);
        assert_eq!(map.radius, 35.0);
        assert_eq!(map.zoom, 10.0);
        assert!((map.center[0] + 71.1).abs() < 1e-9);
        assert!((map.center[1] - 42.3).abs() < 1e-9);
        assert_eq!(map.points[1].color, Some([255, 255, 0]));
    }

    #[test]
    fn test_no_match_degrades_every_panel_independently() {
        let ds = three_records();
        let filters = FilterState {
            day: DaySelection::Wednesday,
            neighborhoods: ds.neighborhoods.clone(),
        };
        let dash = build_dashboard(&ds, &filters, &VIEW);

        assert_eq!(dash.visible_records, 0);
        assert_eq!(dash.most_common, Panel::NoData);
        assert_eq!(dash.map, Panel::NoData);
        assert_eq!(dash.day_mix, Panel::NoData);
        assert_eq!(dash.districts, Panel::NoData);
        assert_eq!(dash.recollections, Panel::NoData);
        assert!(dash.table.is_empty());
    }

    #[test]
    fn test_deselecting_every_neighborhood_shows_the_whole_dataset() {
        let ds = three_records();
        let filters = FilterState {
            day: DaySelection::Friday,
            neighborhoods: BTreeSet::new(),
        };
        let dash = build_dashboard(&ds, &filters, &VIEW);

        assert_eq!(dash.visible_records, ds.len());
        assert!(dash.map.is_ready());
        assert!(dash.day_mix.is_ready());
    }

    #[test]
    fn test_proportions_collapse_rare_districts() {
        let mut recs = Vec::new();
        for i in 0..40 {
            let mut r = record("Roxbury", "W");
            r.pwd_district = Some(if i == 0 { "9".into() } else { "10A".into() });
            r.recollect = Some("WA".into());
            recs.push(r);
        }
        let ds = Dataset::from_records(recs);
        let dash = build_dashboard(&ds, &FilterState::select_all(&ds), &VIEW);

        let districts = dash.districts.ready().unwrap();
        assert_eq!(districts.title, "Public Works District");
        assert_eq!(districts.shares.labels, ["10A", "other"]);
        assert_eq!(districts.shares.counts, [39, 1]);

        let recollect = dash.recollections.ready().unwrap();
        assert_eq!(recollect.shares.labels, ["WA"]);
    }

    #[test]
    fn test_serializes_no_data_placeholders() {
        let ds = three_records();
        let filters = FilterState {
            day: DaySelection::Thursday,
            neighborhoods: ds.neighborhoods.clone(),
        };
        let json = serde_json::to_value(build_dashboard(&ds, &filters, &VIEW)).unwrap();
        assert_eq!(json["most_common"]["status"], "no_data");
        assert_eq!(json["day"], "Thursday");
    }
}
