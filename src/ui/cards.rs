use eframe::egui::{self, Color32, RichText, Ui};

use crate::color;
use crate::state::{ForecastState, FulfillmentState, LifecycleState, ShortfallState};

/// `1234567.891` → `"1,234,567.89"`.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn stat_card(ui: &mut Ui, title: &str, value: String, caption: &str, accent: Color32) {
    egui::Frame::group(ui.style())
        .inner_margin(10.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(180.0);
            ui.label(RichText::new(title).small().weak());
            ui.label(RichText::new(value).size(22.0).strong().color(accent));
            if !caption.is_empty() {
                ui.label(RichText::new(caption).small());
            }
        });
}

pub fn forecast_cards(ui: &mut Ui, fc: &ForecastState) {
    let (label, value) = fc.summary.headline();
    let caption = if fc.summary.has_fitted {
        "Most Recent Value"
    } else {
        "Forecasted Value"
    };
    ui.horizontal_wrapped(|ui: &mut Ui| {
        stat_card(ui, label, format_amount(value, 0), caption, color::FITTED);
        stat_card(
            ui,
            "Accuracy",
            format!("{:.2}%", fc.summary.average_accuracy),
            "Average over filtered rows",
            color::ACTUAL,
        );
        stat_card(
            ui,
            "Total Forecast",
            format_amount(fc.summary.total_forecast, 0),
            &format!("{} rows", fc.summary.row_count),
            color::FORECAST,
        );
    });
}

pub fn lifecycle_cards(ui: &mut Ui, lc: &LifecycleState) {
    let report = &lc.report;
    let title = match &lc.filter.product {
        Some(p) => format!("Total Sales ({p}) - {}", lc.filter.year_label()),
        None => format!("Total Sales - {}", lc.filter.year_label()),
    };
    ui.horizontal_wrapped(|ui: &mut Ui| {
        stat_card(
            ui,
            &title,
            format!("₹{}", format_amount(report.total_sales, 2)),
            &lc.filter.customers.describe(),
            color::ACTUAL,
        );
        if let Some(prev) = &report.previous_year {
            let accent = if report.growth >= 0.0 {
                Color32::from_rgb(22, 163, 74)
            } else {
                Color32::from_rgb(220, 38, 38)
            };
            stat_card(
                ui,
                &format!("Growth vs {prev}"),
                format!("{:+.1}%", report.growth),
                &format!("₹{} previous year", format_amount(report.previous_sales, 2)),
                accent,
            );
        }
    });
}

pub fn shortfall_cards(ui: &mut Ui, sf: &ShortfallState) {
    let s = &sf.report.summary;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        stat_card(
            ui,
            "Short Fall",
            format_amount(s.revenue_loss_units, 0),
            "Units not covered by stock",
            Color32::from_rgb(220, 38, 38),
        );
        stat_card(
            ui,
            "Revenue Loss",
            format!("₹{}", format_amount(s.revenue_loss_value, 2)),
            &format!("{} impactful rows", s.impactful_rows),
            color::ACTUAL,
        );
        stat_card(
            ui,
            "Shortfall in Revenue",
            format!("₹{}", format_amount(s.total_shortfall, 2)),
            "",
            color::FORECAST,
        );
    });
}

pub fn fulfillment_cards(ui: &mut Ui, ff: &FulfillmentState) {
    let accent = ff
        .range()
        .map(|r| color::range_tone(r.tone))
        .unwrap_or(Color32::GRAY);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        stat_card(ui, "Total Orders", ff.totals.orders.to_string(), "", accent);
        stat_card(ui, "Required Quantity", format_amount(ff.totals.required, 0), "", accent);
        stat_card(ui, "Fulfilled Quantity", format_amount(ff.totals.fulfilled, 0), "", accent);
    });
}
