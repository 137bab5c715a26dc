use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, Polygon};

use demand_dash::data::aggregate::ChartPoint;

use crate::color;
use crate::state::{ChartView, ForecastState};

// ---------------------------------------------------------------------------
// Forecast line chart
// ---------------------------------------------------------------------------

/// Label of the category at integer x positions, blank elsewhere.
fn category_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Points of one series, keeping only the buckets where `value` is positive.
fn positive_points(series: &[ChartPoint], value: impl Fn(&ChartPoint) -> f64) -> Vec<[f64; 2]> {
    series
        .iter()
        .enumerate()
        .filter(|(_, p)| value(p) > 0.0)
        .map(|(i, p)| [i as f64, value(p)])
        .collect()
}

/// Tooltip of the forecast chart. The bridging point only carries a copy of
/// the fitted value, so its forecast entry stays blank.
fn hover_text(series: &[ChartPoint], name: &str, x: f64, y: f64) -> String {
    let idx = x.round();
    let point = (idx >= 0.0).then(|| series.get(idx as usize)).flatten();
    let label = point.map(|p| p.label.clone()).unwrap_or_default();
    if name.is_empty() {
        return label;
    }
    if name == "Forecast" && point.is_some_and(|p| p.is_connection) {
        return String::new();
    }
    format!("{name}\n{label}: {y:.0}")
}

/// Actual / fitted / forecast over time, with the bucket toggle above it.
pub fn forecast_chart(ui: &mut Ui, fc: &mut ForecastState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Forecast vs Actual");
        ui.add_space(12.0);
        for view in ChartView::ALL {
            if ui
                .selectable_label(fc.chart_view == view, view.label())
                .clicked()
                && fc.chart_view != view
            {
                fc.set_chart_view(view);
            }
        }
    });

    if fc.series.is_empty() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new("No data for the selected filters").weak());
        });
        ui.add_space(40.0);
        return;
    }

    let labels: Vec<String> = fc.series.iter().map(|p| p.label.clone()).collect();
    let actual = positive_points(&fc.series, |p| p.actual);
    let fitted = positive_points(&fc.series, |p| p.fitted);
    let forecast = positive_points(&fc.series, |p| p.forecast);

    Plot::new("forecast_plot")
        .height(320.0)
        .legend(Legend::default())
        .y_axis_label("Quantity")
        .x_axis_formatter(|mark: GridMark, _range| category_label(&labels, mark.value))
        .label_formatter(|name, point| hover_text(&fc.series, name, point.x, point.y))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(actual)
                    .name("Actual")
                    .color(color::ACTUAL)
                    .width(2.0),
            );
            plot_ui.line(
                Line::new(fitted)
                    .name("Fitted")
                    .color(color::FITTED)
                    .width(2.0),
            );
            plot_ui.line(
                Line::new(forecast)
                    .name("Forecast")
                    .color(color::FORECAST)
                    .style(egui_plot::LineStyle::dashed_loose())
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Category bar chart
// ---------------------------------------------------------------------------

/// A vertical bar per `(label, value)`, one colour for all bars.
pub fn bar_chart(ui: &mut Ui, id: &str, title: &str, data: &[(String, f64)], fill: Color32) {
    ui.strong(title);
    if data.is_empty() {
        ui.label(RichText::new("No data for the selected filters").weak());
        return;
    }

    let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();
    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .name(label)
                .fill(fill)
                .width(0.6)
        })
        .collect();

    Plot::new(id)
        .height(240.0)
        .x_axis_formatter(|mark: GridMark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .allow_drag(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(title));
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

const PIE_STEPS: usize = 96;

/// Index of the slice under plot coordinate `(x, y)` of a unit pie whose
/// first slice starts at 12 o'clock and runs clockwise.
pub fn pie_slice_at(values: &[f64], x: f64, y: f64) -> Option<usize> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 || x.hypot(y) > 1.0 {
        return None;
    }
    // Clockwise angle from the positive y axis.
    let angle = x.atan2(y).rem_euclid(TAU);
    let mut start = 0.0;
    for (i, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let end = start + value / total * TAU;
        if angle < end {
            return Some(i);
        }
        start = end;
    }
    values.iter().rposition(|v| *v > 0.0)
}

fn slice_polygon(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start) / TAU) * PIE_STEPS as f64).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for s in 0..=steps {
        let a = start + (end - start) * s as f64 / steps as f64;
        points.push([a.sin(), a.cos()]);
    }
    points
}

/// Pie of `(label, value, colour)` slices. Returns the index of the slice
/// clicked this frame.
pub fn pie_chart(ui: &mut Ui, id: &str, slices: &[(String, f64, Color32)]) -> Option<usize> {
    let values: Vec<f64> = slices.iter().map(|(_, v, _)| *v).collect();
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        ui.label(RichText::new("No data for the selected filters").weak());
        return None;
    }

    let response = Plot::new(id)
        .height(260.0)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (label, value, fill) in slices {
                if *value <= 0.0 {
                    continue;
                }
                let end = start + value / total * TAU;
                plot_ui.polygon(
                    Polygon::new(slice_polygon(start, end))
                        .fill_color(*fill)
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(format!("{label} ({:.1}%)", value / total * 100.0)),
                );
                start = end;
            }
            if plot_ui.response().clicked() {
                plot_ui.pointer_coordinate()
            } else {
                None
            }
        });

    response
        .inner
        .and_then(|p| pie_slice_at(&values, p.x, p.y))
}
