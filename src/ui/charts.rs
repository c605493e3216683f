use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};

use crate::color::ColorMap;
use crate::data::dashboard::ProportionSpec;

/// Segments used for a full circle.
const CIRCLE_SEGMENTS: f32 = 96.0;

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Paint a pie chart with a legend of label, count and percentage.
///
/// Slices start at twelve o'clock and run clockwise in the order of the spec.
pub fn pie_chart(ui: &mut Ui, spec: &ProportionSpec, diameter: f32) {
    let total = spec.shares.total();
    let colors = ColorMap::new(spec.shares.labels.iter().map(String::as_str));

    ui.vertical(|ui: &mut Ui| {
        ui.strong(&spec.title);

        let (rect, _) = ui.allocate_exact_size(Vec2::splat(diameter), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = diameter * 0.48;

        let mut start = -FRAC_PI_2;
        for (label, count) in spec.shares.iter() {
            let sweep = TAU * count as f32 / total.max(1) as f32;
            let fill = colors.color_for(label);
            for triangle in slice_triangles(center, radius, start, sweep) {
                painter.add(Shape::convex_polygon(triangle.to_vec(), fill, Stroke::NONE));
            }
            start += sweep;
        }
        painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::from_gray(60)));

        egui::Grid::new((&spec.title, "legend"))
            .num_columns(2)
            .show(ui, |ui: &mut Ui| {
                for (label, count) in spec.shares.iter() {
                    let pct = 100.0 * count as f64 / total.max(1) as f64;
                    ui.label(RichText::new("■").color(colors.color_for(label)));
                    ui.label(format!("{label}  {count} ({pct:.1}%)"));
                    ui.end_row();
                }
            });
    });
}

/// Fan of triangles covering the arc `[start, start + sweep]`. Triangles stay
/// convex even when the slice is wider than half the circle.
fn slice_triangles(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<[Pos2; 3]> {
    let steps = ((sweep / TAU) * CIRCLE_SEGMENTS).ceil().max(1.0) as usize;
    let at = |i: usize| center + radius * Vec2::angled(start + sweep * i as f32 / steps as f32);
    (0..steps).map(|i| [center, at(i), at(i + 1)]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_triangles_cover_the_arc() {
        let center = Pos2::new(0.0, 0.0);
        let tris = slice_triangles(center, 10.0, 0.0, TAU * 0.75);
        assert_eq!(tris.len(), 72);
        assert!(tris.iter().all(|t| t[0] == center));

        let last = tris.last().unwrap()[2];
        let expected = center + 10.0 * Vec2::angled(TAU * 0.75);
        assert!((last - expected).length() < 1e-3);
    }

    #[test]
    fn test_tiny_slice_still_gets_a_triangle() {
        let tris = slice_triangles(Pos2::ZERO, 10.0, 0.0, 0.001);
        assert_eq!(tris.len(), 1);
    }
}
