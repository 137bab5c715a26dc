use eframe::egui::{self, Align, Layout, RichText, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use demand_dash::data::aggregate::{AccuracyBand, SortDirection, SortField, TopSkus};
use demand_dash::data::fulfillment::order_details;

use super::cards::format_amount;
use crate::color;
use crate::state::{ForecastState, FulfillmentState};

const ROW_HEIGHT: f32 = 20.0;

const SKU_COLUMNS: [SortField; 9] = [
    SortField::Sku,
    SortField::Product,
    SortField::Actual,
    SortField::Fitted,
    SortField::Forecast,
    SortField::Accuracy,
    SortField::VariancePercent,
    SortField::DepotsCount,
    SortField::Depots,
];

// ---------------------------------------------------------------------------
// Top-performing SKUs
// ---------------------------------------------------------------------------

/// Searchable, sortable table of the highest-volume SKUs.
pub fn top_sku_table(ui: &mut Ui, fc: &mut ForecastState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("Top {} Performing SKUs", fc.top_n));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            let mut query = fc.search.clone();
            let edit = TextEdit::singleline(&mut query)
                .hint_text("Search SKU or product")
                .desired_width(200.0);
            if ui.add(edit).changed() {
                fc.set_search(query);
            }
        });
    });

    let skus = match &fc.top_skus {
        TopSkus::Ranked(skus) => skus,
        TopSkus::NoData => {
            ui.label(RichText::new("No valid SKU data found for the selected filters").weak());
            return;
        }
        TopSkus::NoMatches => {
            ui.label(RichText::new("No results match your search criteria").weak());
            return;
        }
    };

    let sort = fc.sort;
    let mut clicked: Option<SortField> = None;

    ui.push_id("top_sku_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(110.0))
            .columns(Column::auto().at_least(70.0), 6)
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for field in SKU_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        let arrow = match (sort.field == field, sort.direction) {
                            (true, SortDirection::Asc) => " ▲",
                            (true, SortDirection::Desc) => " ▼",
                            (false, _) => "",
                        };
                        let text = RichText::new(format!("{}{arrow}", field.label())).strong();
                        if ui.button(text).clicked() {
                            clicked = Some(field);
                        }
                    });
                }
            })
            .body(|mut body| {
                for sku in skus {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(&sku.sku);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(&sku.product);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format_amount(sku.actual, 0));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format_amount(sku.fitted, 0));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format_amount(sku.forecast, 0));
                        });
                        row.col(|ui: &mut Ui| {
                            let band = AccuracyBand::from_value(sku.accuracy as f64);
                            ui.label(
                                RichText::new(format!("{}%", sku.accuracy))
                                    .color(color::accuracy_band(band)),
                            );
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format!("{:+}%", sku.variance_percent));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(sku.depots.len().to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(sku.depots_label());
                        });
                    });
                }
            });
    });

    if let Some(field) = clicked {
        fc.sort_by(field);
    }
}

// ---------------------------------------------------------------------------
// Month-wise accuracy strip
// ---------------------------------------------------------------------------

/// A paged row of month cards coloured by accuracy band.
pub fn month_accuracy_strip(ui: &mut Ui, fc: &mut ForecastState) {
    ui.strong("Month-wise Accuracy");
    let months = &fc.month_accuracy;
    if months.is_empty() {
        ui.label(RichText::new("No data for the selected filters").weak());
        return;
    }

    let len = months.len();
    let window = fc.month_window;
    let mut step: Option<bool> = None;

    ui.horizontal(|ui: &mut Ui| {
        if ui.add_enabled(window.can_prev(), egui::Button::new("◀")).clicked() {
            step = Some(false);
        }
        for month in window.visible(months) {
            egui::Frame::group(ui.style())
                .inner_margin(8.0)
                .show(ui, |ui: &mut Ui| {
                    ui.set_min_width(120.0);
                    ui.vertical(|ui: &mut Ui| {
                        ui.label(RichText::new(&month.label).strong());
                        ui.label(
                            RichText::new(format!("{:.1}%", month.average_accuracy))
                                .size(18.0)
                                .color(color::accuracy_band(month.band())),
                        );
                        ui.label(RichText::new(format!("{} rows", month.count)).small().weak());
                    });
                });
        }
        if ui
            .add_enabled(window.can_next(len), egui::Button::new("▶"))
            .clicked()
        {
            step = Some(true);
        }
    });

    let shown = window.visible(months).len();
    ui.label(
        RichText::new(format!(
            "Showing {}-{} of {} months",
            window.start + 1,
            window.start + shown,
            len
        ))
        .small()
        .weak(),
    );

    match step {
        Some(true) => fc.month_window.next(len),
        Some(false) => fc.month_window.prev(),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Fulfillment orders
// ---------------------------------------------------------------------------

/// Orders inside the selected ratio range; clicking an order opens its lines.
pub fn orders_table(ui: &mut Ui, ff: &mut FulfillmentState) {
    let Some(range) = ff.range() else {
        ui.label(RichText::new("Select a fulfillment ratio range").weak());
        return;
    };
    ui.strong(format!("Orders with fulfillment ratio {}", range.label));
    if ff.orders.is_empty() {
        ui.label(RichText::new("No orders in this range").weak());
        return;
    }

    let mut picked: Option<String> = None;
    ui.push_id("orders_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(320.0)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(120.0))
            .columns(Column::auto().at_least(80.0), 3)
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for title in ["Order", "Required", "Fulfilled", "Pending", "SKUs"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for order in &ff.orders {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            if ui.link(&order.order).clicked() {
                                picked = Some(order.order.clone());
                            }
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format_amount(order.required, 0));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format_amount(order.fulfilled, 0));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format_amount(order.pending, 0));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(order.sku_count.to_string());
                        });
                    });
                }
            });
    });

    if picked.is_some() {
        ff.selected_order = picked;
    }
}

/// Floating window listing the lines of the selected order.
pub fn order_details_window(ctx: &egui::Context, ff: &mut FulfillmentState) {
    let (Some(order), Some(range)) = (ff.selected_order.clone(), ff.range()) else {
        return;
    };
    let lines = order_details(&ff.rows, range, &order);

    let mut open = true;
    egui::Window::new(format!("Order {order}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(520.0)
        .show(ctx, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .column(Column::auto().at_least(100.0))
                .columns(Column::auto().at_least(70.0), 4)
                .column(Column::remainder())
                .header(ROW_HEIGHT, |mut header| {
                    for title in ["SKU", "Required", "Fulfilled", "Pending", "Short Sales", "Ratio"] {
                        header.col(|ui: &mut Ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for line in &lines {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.label(&line.sku);
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(format_amount(line.required, 0));
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(format_amount(line.fulfilled, 0));
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(format_amount(line.pending, 0));
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(format_amount(line.short_sales, 0));
                            });
                            row.col(|ui: &mut Ui| {
                                let ratio = line
                                    .ratio
                                    .map(|r| format!("{r:.2}%"))
                                    .unwrap_or_else(|| "-".to_string());
                                ui.label(ratio);
                            });
                        });
                    }
                });
        });

    if !open {
        ff.selected_order = None;
    }
}
