use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::dashboard::TableRow;

const HEADERS: [&str; 5] = [
    "Address",
    "Mailing neighborhood",
    "Zip code",
    "Recollect",
    "Trash day",
];

/// Render the filtered records as a striped, resizable table.
pub fn data_table(ui: &mut Ui, rows: &[TableRow]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::initial(280.0).at_least(80.0).clip(true))
        .column(Column::initial(170.0).at_least(60.0).clip(true))
        .column(Column::initial(70.0).at_least(40.0))
        .column(Column::initial(80.0).at_least(40.0))
        .column(Column::remainder().at_least(40.0))
        .header(22.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &rows[row.index()];
                for cell in [
                    &rec.full_address,
                    &rec.mailing_neighborhood,
                    &rec.zip_code,
                    &rec.recollect,
                    &rec.trashday,
                ] {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
