use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::code_color;
use crate::config::DOT_SIZE_RANGE;
use crate::data::filter::resolve_day;
use crate::data::model::DaySelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let neighborhoods = dataset.neighborhoods.clone();

    // ---- Dot size ----
    let mut dot_size = state.dot_size;
    if ui
        .add(egui::Slider::new(&mut dot_size, DOT_SIZE_RANGE).text("Dot size"))
        .changed()
    {
        state.set_dot_size(dot_size);
    }
    ui.separator();

    // ---- Day of week ----
    ui.strong("Day of the week");
    let mut day = state.filters.day;
    egui::ComboBox::from_id_salt("day_select")
        .selected_text(day.label())
        .show_ui(ui, |ui: &mut Ui| {
            for option in DaySelection::OPTIONS {
                ui.selectable_value(&mut day, option, option.label());
            }
        });
    state.set_day(day);

    // Legend of the codes the current day matches.
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for code in resolve_day(state.filters.day) {
            ui.label(RichText::new(code.as_str()).strong().color(code_color(code)));
        }
    });
    ui.separator();

    // ---- Neighborhoods ----
    let header_text = format!(
        "Mailing neighborhoods  ({}/{})",
        state.filters.neighborhoods.len(),
        neighborhoods.len()
    );
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("neighborhoods")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            if state.filters.is_fallback() {
                ui.label(
                    RichText::new("Nothing selected: showing every record")
                        .italics()
                        .weak(),
                );
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for name in &neighborhoods {
                        let mut checked = state.filters.neighborhoods.contains(name);
                        if ui.checkbox(&mut checked, name).changed() {
                            state.toggle_neighborhood(name);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dashboard.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export dashboard JSON…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dash) = &state.dashboard {
            ui.label(format!(
                "{} records loaded, {} visible",
                dash.total_records, dash.visible_records
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open trash schedule")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(dash) = &state.dashboard else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard")
        .set_file_name("dashboard.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match crate::export::write_dashboard(&path, dash) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export dashboard: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
