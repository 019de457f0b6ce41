use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{generate_palette, series_color};
use crate::data::model::{AuthorSet, CellValue, CitationHistory, Table};
use crate::ui::plot;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Articles table
// ---------------------------------------------------------------------------

/// Render the rows of `table` listed in `visible`, with their source index.
pub fn articles_table(ui: &mut Ui, table: &Table, visible: &[usize]) {
    ui.push_id("articles_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(320.0)
            .column(Column::auto().at_least(32.0))
            .columns(
                Column::initial(140.0).at_least(40.0).clip(true),
                table.columns.len(),
            )
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for name in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                    let idx = visible[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(idx.to_string());
                    });
                    for (name, cell) in table.columns.iter().zip(&table.rows[idx]) {
                        row.col(|ui: &mut Ui| {
                            cell_label(ui, name, cell);
                        });
                    }
                });
            });
    });
}

fn cell_label(ui: &mut Ui, column: &str, cell: &CellValue) {
    match cell.as_str() {
        Some(url) if column == "Link" && url.starts_with("http") => {
            ui.hyperlink_to(url, url);
        }
        _ => {
            ui.label(cell.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Author details
// ---------------------------------------------------------------------------

/// One block per author: profile fields followed by the citation history chart.
pub fn author_details(ui: &mut Ui, authors: &AuthorSet) {
    let palette = generate_palette(authors.len());

    for (i, author) in authors.records.iter().enumerate() {
        let name = author.name.to_string();

        ui.label(RichText::new(format!("Name: {name}")).strong());
        ui.label(format!("Affiliation: {}", author.affiliation));
        ui.label(format!("Interests: {}", author.interests));
        ui.label(format!("Cited by: {}", author.cited_by));
        ui.label(format!("H-Index: {}", author.h_index));
        ui.label(format!("i10-Index: {}", author.i10_index));

        ui.add_space(4.0);
        ui.label(RichText::new("Citations Per Year").heading());
        match &author.citations_per_year {
            CitationHistory::Parsed(history) => {
                ui.label(format!("Citations Per Year for {name}"));
                plot::author_citations_chart(ui, i, &name, history, series_color(&palette, i));
            }
            CitationHistory::Missing | CitationHistory::Malformed { .. } => {
                ui.label(format!(
                    "Citations Per Year data for {name} is not in the expected format. Check the Excel file."
                ));
            }
        }
        ui.separator();
    }
}
