use eframe::egui::{self, RichText, Ui};

use crate::data::dashboard::Panel;
use crate::state::AppState;
use crate::ui::{charts, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TrashDayApp {
    pub state: AppState,
}

impl TrashDayApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for TrashDayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered records ----
        if let Some(dash) = &self.state.dashboard {
            egui::TopBottomPanel::bottom("filtered_data")
                .resizable(true)
                .default_height(240.0)
                .show(ctx, |ui| {
                    ui.heading("Filtered Data");
                    table::data_table(ui, &dash.table);
                });
        }

        // ---- Central panel: charts and map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &self.state);
        });
        self.state.recenter_map = false;
    }
}

fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(dash) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a trash schedule to begin  (File → Open…)");
        });
        return;
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Trash Day Checker");
            ui.add_space(4.0);

            ui.strong("Most Common Trash Day Combo in Filtered Data");
            match &dash.most_common {
                Panel::Ready(code) => ui.label(format!(
                    "The most common trash day combo in the filtered data is: {code}"
                )),
                Panel::NoData => ui.label(no_data()),
            };
            ui.separator();

            match &dash.day_mix {
                Panel::Ready(spec) => plot::stacked_bar_plot(ui, spec),
                Panel::NoData => {
                    ui.label(no_data());
                }
            }
            ui.separator();

            ui.strong("Pickup Map");
            match &dash.map {
                Panel::Ready(spec) => plot::map_plot(ui, spec, state.recenter_map),
                Panel::NoData => {
                    ui.label(no_data());
                }
            }
            ui.separator();

            ui.horizontal_top(|ui: &mut Ui| {
                for panel in [&dash.districts, &dash.recollections] {
                    match panel {
                        Panel::Ready(spec) => charts::pie_chart(ui, spec, 220.0),
                        Panel::NoData => {
                            ui.label(no_data());
                        }
                    }
                    ui.add_space(24.0);
                }
            });
        });
}

fn no_data() -> RichText {
    RichText::new("No data available.").italics().weak()
}
