use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, PlotUi, Points};

use crate::data::stats::author_series;

const CHART_HEIGHT: f32 = 260.0;

/// Only whole years get an axis label.
fn year_label(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

/// A fixed-height chart with a year x-axis.
fn year_plot(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    y_label: &str,
    build: impl FnOnce(&mut PlotUi),
) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(y_label.to_string())
        .x_axis_formatter(year_label)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(true)
        .show(ui, build);
}

/// Bar chart of article counts per year.
pub fn articles_per_year_chart(ui: &mut Ui, counts: &BTreeMap<i32, usize>) {
    let bars: Vec<Bar> = counts
        .iter()
        .map(|(&year, &n)| Bar::new(f64::from(year), n as f64).width(0.6))
        .collect();

    year_plot(ui, "articles_per_year", "Number of Articles", |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .name("Articles")
                .color(Color32::LIGHT_BLUE),
        );
    });
}

/// Line chart with point markers of mean citations per year.
pub fn average_citations_chart(ui: &mut Ui, averages: &BTreeMap<i32, f64>) {
    let points: Vec<[f64; 2]> = averages
        .iter()
        .map(|(&year, &mean)| [f64::from(year), mean])
        .collect();

    year_plot(ui, "average_citations", "Average Citations", |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .name("Average citations")
                .color(Color32::LIGHT_BLUE)
                .width(1.5),
        );
        plot_ui.points(
            Points::new(PlotPoints::from(points))
                .color(Color32::LIGHT_BLUE)
                .radius(4.0),
        );
    });
}

/// Citations-per-year line chart for one author.
pub fn author_citations_chart(
    ui: &mut Ui,
    index: usize,
    name: &str,
    history: &BTreeMap<i32, u64>,
    color: Color32,
) {
    let points = author_series(history);

    year_plot(ui, ("author_citations", index), "Citations", |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .name(format!("Citations Per Year for {name}"))
                .color(color)
                .width(1.5),
        );
        plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(4.0));
    });
}
