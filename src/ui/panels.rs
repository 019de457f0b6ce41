use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::YearRange;
use crate::data::model::{Notice, NoticeLevel};
use crate::state::AppState;

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 0);

// ---------------------------------------------------------------------------
// Left side panel – year range filter and load messages
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_range_widget(ui, state);

            let notices: Vec<Notice> = state.notices().cloned().collect();
            if !notices.is_empty() {
                ui.separator();
                ui.strong("Messages");
                notice_list(ui, &notices);
            }
        });
}

/// "Select Year Range": two sliders bounded by the data's year span.
fn year_range_widget(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Year Range");

    let (Some(bounds), Some(current)) = (state.year_bounds, state.year_range) else {
        ui.label("No publication years available.");
        return;
    };

    let mut start = current.start;
    let mut end = current.end;
    let from = ui.add(egui::Slider::new(&mut start, bounds.start..=bounds.end).text("From"));
    let to = ui.add(egui::Slider::new(&mut end, bounds.start..=bounds.end).text("To"));

    if from.changed() || to.changed() {
        // Dragging one handle past the other pushes it along.
        if from.changed() && start > end {
            end = start;
        } else if to.changed() && end < start {
            start = end;
        }
        state.set_year_range(YearRange::new(start, end));
    }

    if ui.small_button("Full range").clicked() {
        state.set_year_range(bounds);
    }
}

/// Errors in red, warnings in amber.
pub fn notice_list(ui: &mut Ui, notices: &[Notice]) {
    for notice in notices {
        let color = match notice.level {
            NoticeLevel::Error => Color32::RED,
            NoticeLevel::Warning => WARNING_COLOR,
        };
        ui.label(RichText::new(&notice.message).color(color));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open publications…").clicked() {
                open_publications_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open authors…").clicked() {
                open_authors_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reload data").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} articles loaded, {} visible · {} authors",
            state.publications.data.len(),
            state.visible_indices.len(),
            state.authors.data.len()
        ));

        let errors = state
            .notices()
            .filter(|n| n.level == NoticeLevel::Error)
            .count();
        if errors > 0 {
            ui.separator();
            ui.label(RichText::new(format!("{errors} load error(s)")).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

const SUPPORTED: [&str; 8] = ["csv", "xlsx", "xlsm", "xls", "ods", "json", "parquet", "pq"];

fn pick_file(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &SUPPORTED)
        .add_filter("CSV", &["csv"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

pub fn open_publications_dialog(state: &mut AppState) {
    if let Some(path) = pick_file("Open publications table") {
        log::info!("Publications file set to {}", path.display());
        state.set_publications_path(path);
    }
}

pub fn open_authors_dialog(state: &mut AppState) {
    if let Some(path) = pick_file("Open author table") {
        log::info!("Authors file set to {}", path.display());
        state.set_authors_path(path);
    }
}
