use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: year filter + messages ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Bibliometric Analysis Dashboard");
                    ui.add_space(8.0);
                    topic_section(ui, &self.state);
                    ui.add_space(16.0);
                    author_section(ui, &self.state);
                });
        });
    }
}

fn subheader(ui: &mut Ui, text: &str) {
    ui.add_space(6.0);
    ui.strong(text);
}

/// "Topic-wise Bibliometric Analysis": articles table and per-year charts.
fn topic_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Topic-wise Bibliometric Analysis");
    ui.separator();

    let publications = &state.publications.data;
    if publications.is_empty() {
        ui.label("No heart disease data available to display.");
        return;
    }

    subheader(ui, "Articles Table");
    tables::articles_table(ui, &publications.table, &state.visible_indices);

    subheader(ui, "Articles Published Per Year");
    plot::articles_per_year_chart(ui, &state.articles_per_year);

    subheader(ui, "Average Citations Per Year");
    plot::average_citations_chart(ui, &state.average_citations);
}

/// "Author-wise Bibliometric Analysis": one block per author.
fn author_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Author-wise Bibliometric Analysis");
    ui.separator();

    let authors = &state.authors.data;
    if authors.is_empty() {
        ui.label("No author data available to display.");
        return;
    }

    subheader(ui, "Author Details");
    tables::author_details(ui, authors);
}
