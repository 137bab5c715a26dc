use eframe::egui::{self, ScrollArea, Ui};

use demand_dash::data::lifecycle::SalesBucket;

use crate::color;
use crate::state::{AppState, View};
use crate::ui::{cards, panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DemandDashApp {
    pub state: AppState,
}

impl DemandDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DemandDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + view tabs ----
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

        // ---- Central panel: cards, charts, tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match self.state.view {
                    View::Forecast => forecast_view(ui, &mut self.state),
                    View::Lifecycle => lifecycle_view(ui, &mut self.state),
                    View::Shortfall => shortfall_view(ui, &mut self.state),
                    View::Fulfillment => fulfillment_view(ui, &mut self.state),
                });
        });

        if self.state.view == View::Fulfillment {
            tables::order_details_window(ctx, &mut self.state.fulfillment);
        }
    }
}

fn buckets(data: &[SalesBucket]) -> Vec<(String, f64)> {
    data.iter().map(|b| (b.name.clone(), b.sales)).collect()
}

fn forecast_view(ui: &mut Ui, state: &mut AppState) {
    let fc = &mut state.forecast;
    cards::forecast_cards(ui, fc);
    ui.add_space(8.0);
    plot::forecast_chart(ui, fc);
    ui.separator();
    tables::month_accuracy_strip(ui, fc);
    ui.separator();
    tables::top_sku_table(ui, fc);
}

fn lifecycle_view(ui: &mut Ui, state: &mut AppState) {
    let lc = &mut state.lifecycle;
    cards::lifecycle_cards(ui, lc);
    ui.add_space(8.0);

    plot::bar_chart(
        ui,
        "sales_by_customer",
        "Sales by Customer",
        &buckets(&lc.report.by_customer),
        color::ACTUAL,
    );
    ui.separator();
    plot::bar_chart(
        ui,
        "sales_by_month",
        "Monthly Sales",
        &buckets(&lc.report.by_month),
        color::FITTED,
    );
    ui.separator();

    ui.strong("Sales by Product");
    let slices: Vec<_> = lc
        .report
        .by_product
        .iter()
        .map(|p| (p.product.clone(), p.sales, lc.product_colors.color_for(&p.product)))
        .collect();
    if let Some(i) = plot::pie_chart(ui, "product_pie", &slices) {
        let product = slices[i].0.clone();
        lc.toggle_product(&product);
    }
}

fn shortfall_view(ui: &mut Ui, state: &mut AppState) {
    let sf = &mut state.shortfall;
    cards::shortfall_cards(ui, sf);
    ui.add_space(8.0);

    let by_month: Vec<(String, f64)> = sf
        .report
        .by_month
        .iter()
        .map(|m| (m.month.clone(), m.shortfall))
        .collect();
    plot::bar_chart(
        ui,
        "shortfall_by_month",
        "Shortfall by Month",
        &by_month,
        egui::Color32::from_rgb(220, 38, 38),
    );
    ui.separator();

    ui.strong("Shortfall by Category");
    let slices: Vec<_> = sf
        .report
        .by_category
        .iter()
        .map(|c| (c.name.clone(), c.value, sf.category_colors.color_for(&c.name)))
        .collect();
    if let Some(i) = plot::pie_chart(ui, "category_pie", &slices) {
        let mut filter = sf.filter.clone();
        let name = slices[i].0.clone();
        filter.category = match filter.category {
            Some(current) if current == name => None,
            _ => Some(name),
        };
        sf.set_filter(filter);
    }
}

fn fulfillment_view(ui: &mut Ui, state: &mut AppState) {
    let ff = &mut state.fulfillment;
    cards::fulfillment_cards(ui, ff);
    ui.add_space(8.0);
    if ff.show_orders {
        tables::orders_table(ui, ff);
    } else {
        ui.label("Pick a fulfillment ratio range to list its orders.");
    }
}
