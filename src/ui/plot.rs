use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotBounds, PlotPoint, Points};

use crate::color::code_color;
use crate::data::dashboard::{MapSpec, StackedBarSpec};
use crate::data::model::ScheduleCode;

/// Metres per degree of latitude.
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Screen points covered by one map tile at zoom 0.
const TILE_SIZE: f64 = 256.0;

// ---------------------------------------------------------------------------
// Point map
// ---------------------------------------------------------------------------

/// Render the scatter map. When `recenter` is set the view jumps to the
/// map's centre and zoom.
pub fn map_plot(ui: &mut Ui, spec: &MapSpec, recenter: bool) {
    let width = f64::from(ui.available_width());
    let height = 420.0_f32;

    Plot::new("trash_map")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if recenter {
                let degrees_per_point = 360.0 / (TILE_SIZE * 2f64.powf(spec.zoom));
                let half_w = width / 2.0 * degrees_per_point;
                let half_h = f64::from(height) / 2.0 * degrees_per_point;
                let [cx, cy] = spec.center;
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [cx - half_w, cy - half_h],
                    [cx + half_w, cy + half_h],
                ));
            }

            // Dot radius is in metres: convert through the current transform.
            let origin = plot_ui.screen_from_plot(PlotPoint::new(spec.center[0], spec.center[1]));
            let offset = plot_ui.screen_from_plot(PlotPoint::new(
                spec.center[0],
                spec.center[1] + spec.radius / METRES_PER_DEGREE,
            ));
            let radius = (origin.y - offset.y).abs().max(1.0);

            // Records outside the colour table carry no code and are skipped.
            for code in ScheduleCode::ALL {
                let points: Vec<[f64; 2]> = spec
                    .points
                    .iter()
                    .filter(|p| p.code == Some(code))
                    .map(|p| [p.x, p.y])
                    .collect();
                if points.is_empty() {
                    continue;
                }

                plot_ui.points(
                    Points::new(points)
                        .name(code.as_str())
                        .color(code_color(code))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Stacked bar chart
// ---------------------------------------------------------------------------

/// Render neighborhoods as stacked bars, one layer per schedule code.
pub fn stacked_bar_plot(ui: &mut Ui, spec: &StackedBarSpec) {
    let mut charts: Vec<BarChart> = Vec::with_capacity(spec.series.len());
    for series in &spec.series {
        let bars: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Bar::new(i as f64, f64::from(count))
                    .width(0.7)
                    .name(&spec.categories[i])
            })
            .collect();

        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(series.code.as_str())
            .color(code_color(series.code))
            .stack_on(&below);
        charts.push(chart);
    }

    let categories = spec.categories.clone();
    ui.strong(&spec.title);
    Plot::new("day_mix")
        .height(320.0)
        .legend(Legend::default())
        .y_axis_label("Addresses")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            categories.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
