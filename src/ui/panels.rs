use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use demand_dash::data::fulfillment::RATIO_RANGES;
use demand_dash::data::lifecycle::{ALL_CUSTOMERS, ALL_YEARS};
use demand_dash::data::shortfall::ShortfallFilter;

use crate::color;
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Dropdown helper
// ---------------------------------------------------------------------------

/// A labelled combo box. Returns the option the user picked this frame.
fn dropdown(ui: &mut Ui, id: &str, label: &str, current: &str, options: &[String]) -> Option<String> {
    let mut picked = None;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if options.is_empty() {
                ui.label("No options");
            }
            for opt in options {
                if ui.selectable_label(current == opt, opt.as_str()).clicked() {
                    picked = Some(opt.clone());
                }
            }
        });
    ui.add_space(4.0);
    picked
}

/// Prefix `options` with a catch-all entry.
fn with_catch_all(all_label: &str, options: &[String]) -> Vec<String> {
    std::iter::once(all_label.to_string())
        .chain(options.iter().cloned())
        .collect()
}

fn optional(label: String, all_label: &str) -> Option<String> {
    (label != all_label).then_some(label)
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel for the active view.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.view {
            View::Forecast => forecast_filters(ui, state),
            View::Lifecycle => lifecycle_filters(ui, state),
            View::Shortfall => shortfall_filters(ui, state),
            View::Fulfillment => fulfillment_filters(ui, state),
        });
}

fn forecast_filters(ui: &mut Ui, state: &mut AppState) {
    let fc = &mut state.forecast;
    if fc.rows.is_empty() {
        ui.label("No forecast data loaded.");
        return;
    }

    let picked = dropdown(ui, "fc_product", "Product", fc.selection.product.label(), &fc.product_options);
    if let Some(p) = picked {
        fc.set_product(&p);
    }
    let picked = dropdown(ui, "fc_sku", "SKU", fc.selection.sku.label(), &fc.sku_options);
    if let Some(s) = picked {
        fc.set_sku(&s);
    }
    let picked = dropdown(ui, "fc_depot", "Depot", fc.selection.depot.label(), &fc.depot_options);
    if let Some(d) = picked {
        fc.set_depot(&d);
    }
    let picked = dropdown(ui, "fc_month", "Month", fc.selection.month.label(), &fc.month_options);
    if let Some(m) = picked {
        fc.set_month(&m);
    }
    let picked = dropdown(ui, "fc_year", "Year", fc.selection.year.label(), &fc.year_options);
    if let Some(y) = picked {
        fc.set_year(&y);
    }

    ui.separator();
    if ui
        .add_enabled(fc.selection.is_filtered(), egui::Button::new("Reset Filters"))
        .clicked()
    {
        fc.reset_filters();
    }
    ui.label(format!("{} of {} rows match", fc.filtered_count, fc.rows.len()));
}

fn lifecycle_filters(ui: &mut Ui, state: &mut AppState) {
    let lc = &mut state.lifecycle;
    if lc.rows.is_empty() {
        ui.label("No lifecycle data loaded.");
        return;
    }

    let years = with_catch_all(ALL_YEARS, &lc.years);
    let picked = dropdown(ui, "lc_year", "Financial Year", lc.filter.year_label(), &years);
    if let Some(y) = picked {
        lc.set_financial_year(optional(y, ALL_YEARS));
    }

    ui.strong("Customers");
    let mut toggled: Option<String> = None;
    let entries = with_catch_all(ALL_CUSTOMERS, &lc.customers);
    for customer in &entries {
        let mut checked = lc.filter.customers.is_selected(customer);
        if ui.checkbox(&mut checked, customer.as_str()).changed() {
            toggled = Some(customer.clone());
        }
    }
    if let Some(c) = toggled {
        lc.toggle_customer(&c);
    }

    if let Some(product) = lc.filter.product.clone() {
        ui.separator();
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("Product: {product}"));
            if ui.small_button("Clear").clicked() {
                lc.toggle_product(&product);
            }
        });
    }
}

fn shortfall_filters(ui: &mut Ui, state: &mut AppState) {
    const ALL_MONTHS: &str = "All Months";
    const ALL_FYS: &str = "All FYs";
    const ALL_CATEGORIES: &str = "All Categories";

    let sf = &mut state.shortfall;
    if sf.rows.is_empty() {
        ui.label("No shortfall data loaded.");
        return;
    }

    let mut filter = sf.filter.clone();
    let months = with_catch_all(ALL_MONTHS, &sf.month_options);
    let current = filter.month.as_deref().unwrap_or(ALL_MONTHS).to_string();
    if let Some(m) = dropdown(ui, "sf_month", "Month", &current, &months) {
        filter.month = optional(m, ALL_MONTHS);
    }
    let fys = with_catch_all(ALL_FYS, &sf.fy_options);
    let current = filter.fy.as_deref().unwrap_or(ALL_FYS).to_string();
    if let Some(fy) = dropdown(ui, "sf_fy", "Financial Year", &current, &fys) {
        filter.fy = optional(fy, ALL_FYS);
    }
    let categories = with_catch_all(ALL_CATEGORIES, &sf.category_options);
    let current = filter.category.as_deref().unwrap_or(ALL_CATEGORIES).to_string();
    if let Some(c) = dropdown(ui, "sf_category", "Category", &current, &categories) {
        filter.category = optional(c, ALL_CATEGORIES);
    }

    ui.separator();
    if ui.button("Reset Filters").clicked() {
        filter = ShortfallFilter::default();
    }
    if filter != sf.filter {
        sf.set_filter(filter);
    }
}

fn fulfillment_filters(ui: &mut Ui, state: &mut AppState) {
    let ff = &mut state.fulfillment;
    if ff.rows.is_empty() {
        ui.label("No fulfillment data loaded.");
        return;
    }

    ui.strong("Fulfillment Ratio Range");
    for (i, range) in RATIO_RANGES.iter().enumerate() {
        let text = RichText::new(range.label).color(color::range_tone(range.tone));
        if ui
            .selectable_label(ff.selected_range == Some(i), text)
            .clicked()
        {
            ff.select_range(i);
        }
    }
    if ff.selected_range.is_some() && !ff.show_orders && ui.button("Show orders").clicked() {
        ff.show_orders = true;
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload(state.view);
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.title()).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        if let Some(msg) = state.status_message() {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else {
            ui.label(
                RichText::new(state.dataset_path(state.view).display().to_string()).weak(),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Pick a CSV file for the active view and load it.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Open {} data", state.view.title()))
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {} for {}", path.display(), state.view.title());
        state.open(state.view, path);
    }
}
