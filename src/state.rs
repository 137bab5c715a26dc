use std::path::{Path, PathBuf};

use demand_dash::config::DashboardConfig;
use demand_dash::data::aggregate::{
    bridge_forecast, by_month, by_quarter, by_year, chart_series, month_wise_accuracy,
    top_performing, ChartPoint, ForecastSummary, MonthAccuracy, MonthWindow, SortField,
    SortState, TopSkus,
};
use demand_dash::data::filter::{
    depot_options, filter_rows, month_options, product_options, sku_options, year_options,
    Choice, Selection,
};
use demand_dash::data::fulfillment::{
    aggregate_orders, FulfillmentTotals, OrderTotals, RatioRange, RATIO_RANGES,
};
use demand_dash::data::lifecycle::{
    customer_options, financial_year_options, LifecycleFilter, LifecycleReport,
};
use demand_dash::data::loader::{load_file, CsvRow};
use demand_dash::data::model::{ForecastRow, FulfillmentRow, LifecycleRow, ShortfallRow};
use demand_dash::data::shortfall::{
    category_options, chart_categories, fy_options, month_options as shortfall_month_options,
    ShortfallFilter, ShortfallReport,
};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Forecast,
    Lifecycle,
    Shortfall,
    Fulfillment,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Forecast,
        View::Lifecycle,
        View::Shortfall,
        View::Fulfillment,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Forecast => "Demand Forecast",
            View::Lifecycle => "Sales Lifecycle",
            View::Shortfall => "Revenue Shortfall",
            View::Fulfillment => "Order Fulfillment",
        }
    }
}

/// Bucket size of the forecast line chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartView {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl ChartView {
    pub const ALL: [ChartView; 3] = [ChartView::Monthly, ChartView::Quarterly, ChartView::Yearly];

    pub fn label(self) -> &'static str {
        match self {
            ChartView::Monthly => "Monthly",
            ChartView::Quarterly => "Quarterly",
            ChartView::Yearly => "Yearly",
        }
    }
}

/// Load one dataset; a failure is logged and leaves the dataset empty.
fn load_rows<T: CsvRow>(path: &Path) -> (Vec<T>, Option<String>) {
    match load_file(path) {
        Ok(rows) => (rows, None),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            (Vec::new(), Some(format!("Error: {e}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Forecast view
// ---------------------------------------------------------------------------

pub struct ForecastState {
    pub rows: Vec<ForecastRow>,
    pub selection: Selection,
    pub product_options: Vec<String>,
    pub sku_options: Vec<String>,
    pub depot_options: Vec<String>,
    pub month_options: Vec<String>,
    pub year_options: Vec<String>,

    pub chart_view: ChartView,
    pub sort: SortState,
    pub search: String,
    pub top_n: usize,
    pub month_window: MonthWindow,

    // Derived from `rows` + `selection`; rebuilt by `recompute`.
    pub filtered_count: usize,
    pub summary: ForecastSummary,
    pub series: Vec<ChartPoint>,
    pub top_skus: TopSkus,
    pub month_accuracy: Vec<MonthAccuracy>,

    pub error: Option<String>,
}

impl ForecastState {
    pub fn new(top_n: usize, visible_months: usize) -> Self {
        Self {
            rows: Vec::new(),
            selection: Selection::default(),
            product_options: Vec::new(),
            sku_options: Vec::new(),
            depot_options: Vec::new(),
            month_options: month_options(),
            year_options: Vec::new(),
            chart_view: ChartView::default(),
            sort: SortState::default(),
            search: String::new(),
            top_n,
            month_window: MonthWindow::new(visible_months),
            filtered_count: 0,
            summary: ForecastSummary::default(),
            series: Vec::new(),
            top_skus: TopSkus::NoData,
            month_accuracy: Vec::new(),
            error: None,
        }
    }

    /// Ingest a newly loaded dataset and reset every filter.
    pub fn set_rows(&mut self, rows: Vec<ForecastRow>) {
        self.rows = rows;
        self.selection.reset();
        self.product_options = product_options(&self.rows);
        self.year_options = year_options(&self.rows);
        self.refresh_dependent_options();
        self.recompute();
    }

    fn refresh_dependent_options(&mut self) {
        self.sku_options = sku_options(&self.rows, &self.selection.product);
        self.depot_options = depot_options(&self.rows, &self.selection.sku);
    }

    pub fn set_product(&mut self, label: &str) {
        self.selection.set_product(Choice::from_label(label));
        self.refresh_dependent_options();
        self.recompute();
    }

    pub fn set_sku(&mut self, label: &str) {
        self.selection.set_sku(Choice::from_label(label));
        self.refresh_dependent_options();
        self.recompute();
    }

    pub fn set_depot(&mut self, label: &str) {
        self.selection.depot = Choice::from_label(label);
        self.recompute();
    }

    pub fn set_month(&mut self, label: &str) {
        self.selection.month = Choice::from_label(label);
        self.recompute();
    }

    pub fn set_year(&mut self, label: &str) {
        self.selection.year = Choice::from_label(label);
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.selection.reset();
        self.refresh_dependent_options();
        self.recompute();
    }

    pub fn set_chart_view(&mut self, view: ChartView) {
        self.chart_view = view;
        self.recompute();
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort.click(field);
        self.recompute();
    }

    pub fn set_search(&mut self, query: String) {
        self.search = query;
        self.recompute();
    }

    /// Re-run the whole filter → aggregate pipeline.
    pub fn recompute(&mut self) {
        let filtered = filter_rows(&self.rows, &self.selection);

        self.filtered_count = filtered.len();
        self.summary = ForecastSummary::compute(&filtered);
        self.series = match self.chart_view {
            ChartView::Monthly => chart_series(&by_month(&filtered)),
            ChartView::Quarterly => chart_series(&by_quarter(&filtered)),
            ChartView::Yearly => chart_series(&by_year(&filtered)),
        };
        bridge_forecast(&mut self.series);
        self.top_skus = top_performing(&filtered, &self.search, self.top_n, self.sort);
        self.month_accuracy = month_wise_accuracy(&filtered, self.selection.year.is_all());
        self.month_window.reset();
    }
}

// ---------------------------------------------------------------------------
// Lifecycle view
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct LifecycleState {
    pub rows: Vec<LifecycleRow>,
    pub customers: Vec<String>,
    pub years: Vec<String>,
    pub filter: LifecycleFilter,
    pub report: LifecycleReport,
    pub product_colors: ColorMap,
    pub error: Option<String>,
}

impl LifecycleState {
    pub fn set_rows(&mut self, rows: Vec<LifecycleRow>) {
        self.rows = rows;
        self.customers = customer_options(&self.rows);
        self.years = financial_year_options(&self.rows);
        self.filter = LifecycleFilter::default();
        self.recompute();
        let products: Vec<String> = self
            .report
            .by_product
            .iter()
            .map(|p| p.product.clone())
            .collect();
        self.product_colors = ColorMap::new(&products);
    }

    pub fn toggle_customer(&mut self, customer: &str) {
        self.filter.customers.toggle(customer);
        self.recompute();
    }

    pub fn set_financial_year(&mut self, year: Option<String>) {
        self.filter.financial_year = year;
        self.recompute();
    }

    pub fn toggle_product(&mut self, product: &str) {
        self.filter.toggle_product(product);
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.report = LifecycleReport::compute(&self.rows, &self.filter, &self.years);
    }
}

// ---------------------------------------------------------------------------
// Shortfall view
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ShortfallState {
    pub rows: Vec<ShortfallRow>,
    pub month_options: Vec<String>,
    pub fy_options: Vec<String>,
    pub category_options: Vec<String>,
    pub filter: ShortfallFilter,
    pub report: ShortfallReport,
    pub category_colors: ColorMap,
    pub error: Option<String>,
}

impl ShortfallState {
    pub fn set_rows(&mut self, rows: Vec<ShortfallRow>) {
        self.rows = rows;
        self.month_options = shortfall_month_options(&self.rows);
        self.fy_options = fy_options(&self.rows);
        self.category_options = category_options(&self.rows);
        self.category_colors = ColorMap::new(&chart_categories(&self.rows));
        self.filter = ShortfallFilter::default();
        self.recompute();
    }

    pub fn set_filter(&mut self, filter: ShortfallFilter) {
        self.filter = filter;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.report = ShortfallReport::compute(&self.rows, &self.filter);
    }
}

// ---------------------------------------------------------------------------
// Fulfillment view
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FulfillmentState {
    pub rows: Vec<FulfillmentRow>,
    /// Index into [`RATIO_RANGES`].
    pub selected_range: Option<usize>,
    pub orders: Vec<OrderTotals>,
    pub totals: FulfillmentTotals,
    pub show_orders: bool,
    pub selected_order: Option<String>,
    pub error: Option<String>,
}

impl FulfillmentState {
    pub fn set_rows(&mut self, rows: Vec<FulfillmentRow>) {
        self.rows = rows;
        self.selected_range = None;
        self.selected_order = None;
        self.show_orders = false;
        self.recompute();
    }

    pub fn range(&self) -> Option<&'static RatioRange> {
        self.selected_range.and_then(|i| RATIO_RANGES.get(i))
    }

    pub fn select_range(&mut self, index: usize) {
        self.selected_range = Some(index);
        self.selected_order = None;
        self.show_orders = true;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.orders = match self.range() {
            Some(range) => aggregate_orders(&self.rows, range),
            None => Vec::new(),
        };
        self.totals = FulfillmentTotals::from_orders(&self.orders);
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub view: View,
    pub forecast: ForecastState,
    pub lifecycle: LifecycleState,
    pub shortfall: ShortfallState,
    pub fulfillment: FulfillmentState,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            forecast: ForecastState::new(config.top_n, config.visible_months),
            lifecycle: LifecycleState::default(),
            shortfall: ShortfallState::default(),
            fulfillment: FulfillmentState::default(),
            view: View::default(),
            config,
        }
    }

    /// Load every dataset named in the config.
    pub fn load_all(&mut self) {
        for view in View::ALL {
            self.reload(view);
        }
    }

    pub fn dataset_path(&self, view: View) -> &Path {
        match view {
            View::Forecast => self.config.forecast_csv.as_path(),
            View::Lifecycle => self.config.lifecycle_csv.as_path(),
            View::Shortfall => self.config.shortfall_csv.as_path(),
            View::Fulfillment => self.config.fulfillment_csv.as_path(),
        }
    }

    /// Point `view` at a different file and load it.
    pub fn open(&mut self, view: View, path: PathBuf) {
        match view {
            View::Forecast => self.config.forecast_csv = path,
            View::Lifecycle => self.config.lifecycle_csv = path,
            View::Shortfall => self.config.shortfall_csv = path,
            View::Fulfillment => self.config.fulfillment_csv = path,
        }
        self.reload(view);
    }

    pub fn reload(&mut self, view: View) {
        let path = self.dataset_path(view).to_path_buf();
        match view {
            View::Forecast => {
                let (rows, error) = load_rows(&path);
                self.forecast.set_rows(rows);
                self.forecast.error = error;
            }
            View::Lifecycle => {
                let (rows, error) = load_rows(&path);
                self.lifecycle.set_rows(rows);
                self.lifecycle.error = error;
            }
            View::Shortfall => {
                let (rows, error) = load_rows(&path);
                self.shortfall.set_rows(rows);
                self.shortfall.error = error;
            }
            View::Fulfillment => {
                let (rows, error) = load_rows(&path);
                self.fulfillment.set_rows(rows);
                self.fulfillment.error = error;
            }
        }
    }

    /// Error banner of the active view, if its dataset failed to load.
    pub fn status_message(&self) -> Option<&str> {
        match self.view {
            View::Forecast => self.forecast.error.as_deref(),
            View::Lifecycle => self.lifecycle.error.as_deref(),
            View::Shortfall => self.shortfall.error.as_deref(),
            View::Fulfillment => self.fulfillment.error.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use demand_dash::data::model::Period;

    fn row(product: &str, sku: &str, depot: &str, month: &str, actual: f64, fitted: f64) -> ForecastRow {
        ForecastRow {
            product: product.into(),
            sku: sku.into(),
            depot: depot.into(),
            month: month.into(),
            period: Period::parse(month),
            actual,
            fitted,
            forecast: 0.0,
            accuracy: 90.0,
            has_accuracy: true,
        }
    }

    fn forecast() -> ForecastState {
        let mut state = ForecastState::new(10, 4);
        state.set_rows(vec![
            row("Wire", "W-1", "North", "01-01-2023", 100.0, 90.0),
            row("Wire", "W-2", "South", "02-01-2023", 50.0, 45.0),
            row("Lamp", "L-1", "East", "01-01-2024", 20.0, 25.0),
        ]);
        state
    }

    #[test]
    fn product_change_cascades_options() {
        let mut state = forecast();
        assert_eq!(state.filtered_count, 3);

        state.set_product("Wire");
        assert_eq!(state.sku_options, vec!["All", "W-1", "W-2"]);
        assert_eq!(state.depot_options, vec!["All", "North", "South", "East"]);
        assert_eq!(state.filtered_count, 2);

        state.set_sku("W-2");
        assert_eq!(state.depot_options, vec!["All", "South"]);
        assert_eq!(state.filtered_count, 1);

        state.set_product("Lamp");
        assert!(state.selection.sku.is_all());
        assert_eq!(state.filtered_count, 1);

        state.reset_filters();
        assert_eq!(state.filtered_count, 3);
        assert_eq!(state.sku_options.len(), 4);
    }

    #[test]
    fn derived_views_follow_selection() {
        let mut state = forecast();
        match &state.top_skus {
            TopSkus::Ranked(skus) => assert_eq!(skus[0].sku, "W-1"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(state.series.len(), 3);

        state.set_chart_view(ChartView::Yearly);
        let labels: Vec<&str> = state.series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2023", "2024"]);

        state.set_year("2023");
        assert_eq!(state.filtered_count, 2);
        // A specific year pools the strip by month name.
        assert_eq!(state.month_accuracy[0].label, "January");

        state.set_search("nothing-like-this".into());
        assert_eq!(state.top_skus, TopSkus::NoMatches);

        state.set_month("December");
        assert_eq!(state.filtered_count, 0);
        assert_eq!(state.top_skus, TopSkus::NoData);
        assert!(state.series.is_empty());
    }

    #[test]
    fn failed_load_leaves_empty_dataset_with_banner() {
        let config = DashboardConfig {
            forecast_csv: PathBuf::from("/missing/forecast.csv"),
            ..Default::default()
        };
        let mut app = AppState::new(config);
        app.reload(View::Forecast);
        assert!(app.forecast.rows.is_empty());
        assert!(app.status_message().is_some_and(|m| m.starts_with("Error")));
        assert_eq!(app.forecast.top_skus, TopSkus::NoData);
    }

    #[test]
    fn open_switches_dataset_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Orders,SKU,Required Quantity,Fullfilled Quantity,Pending Quantity,ShortSales,Order fullfillment ratio").unwrap();
        writeln!(file, "SO-1,A,100,99,1,1,99%").unwrap();

        let mut app = AppState::new(DashboardConfig::default());
        app.view = View::Fulfillment;
        app.open(View::Fulfillment, file.path().to_path_buf());
        assert_eq!(app.dataset_path(View::Fulfillment), file.path());
        assert!(app.status_message().is_none());

        app.fulfillment.select_range(2);
        assert_eq!(app.fulfillment.totals.orders, 1);
        assert!(app.fulfillment.show_orders);
    }

    #[test]
    fn lifecycle_and_shortfall_recompute() {
        let mut lifecycle = LifecycleState::default();
        lifecycle.set_rows(vec![
            LifecycleRow {
                customer: "Acme".into(),
                financial_year: "FY23".into(),
                product: "Cable".into(),
                month: "April".into(),
                sales: 10.0,
            },
            LifecycleRow {
                customer: "Bolt".into(),
                financial_year: "FY23".into(),
                product: "Lamp".into(),
                month: "May".into(),
                sales: 30.0,
            },
        ]);
        assert_eq!(lifecycle.report.total_sales, 40.0);
        lifecycle.toggle_customer("Bolt");
        assert_eq!(lifecycle.report.total_sales, 30.0);
        lifecycle.toggle_product("Cable");
        assert_eq!(lifecycle.report.total_sales, 0.0);

        let mut shortfall = ShortfallState::default();
        shortfall.set_rows(vec![ShortfallRow {
            fy: "FY24".into(),
            category: "Wires".into(),
            months: "05-2023".into(),
            shortfall_in_revenue: 500.0,
            impactful: true,
            pending_so: 3.0,
            closing_stock: 1.0,
            per_unit: 10.0,
        }]);
        assert_eq!(shortfall.report.summary.revenue_loss_value, 20.0);
        shortfall.set_filter(ShortfallFilter {
            fy: Some("FY25".into()),
            ..Default::default()
        });
        assert_eq!(shortfall.report.summary.total_shortfall, 0.0);
    }

    #[test]
    fn blank_shortfall_category_is_coloured() {
        use demand_dash::data::shortfall::UNKNOWN;
        use eframe::egui::Color32;

        let blank = ShortfallRow {
            fy: "FY24".into(),
            category: String::new(),
            months: "05-2023".into(),
            shortfall_in_revenue: 200.0,
            impactful: true,
            pending_so: 0.0,
            closing_stock: 0.0,
            per_unit: 1.0,
        };
        let wires = ShortfallRow {
            category: "Wires".into(),
            ..blank.clone()
        };
        let mut shortfall = ShortfallState::default();
        shortfall.set_rows(vec![wires, blank]);

        assert_eq!(shortfall.category_options, vec!["Wires"]);
        assert!(shortfall.report.by_category.iter().any(|c| c.name == UNKNOWN));
        let unknown = shortfall.category_colors.color_for(UNKNOWN);
        assert_ne!(unknown, Color32::GRAY);
        assert_ne!(unknown, shortfall.category_colors.color_for("Wires"));
    }
}
