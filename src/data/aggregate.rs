//! Period buckets, accuracy metrics and SKU rankings over forecast rows.
//!
//! Everything here is a pure function of its inputs and is re-run from
//! scratch whenever a selection changes.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::{Add, AddAssign};

use super::model::{ForecastRow, Period};

// ---------------------------------------------------------------------------
// Accuracy metrics
// ---------------------------------------------------------------------------

/// Round half toward positive infinity, so `-2.5` becomes `-2`.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// `round((1 - |actual - fitted| / fitted) * 100)`, or `0` when nothing was
/// fitted.
pub fn compute_accuracy(actual: f64, fitted: f64) -> i64 {
    if fitted == 0.0 {
        return 0;
    }
    round_half_up((1.0 - (actual - fitted).abs() / fitted) * 100.0)
}

/// Signed deviation of actual from fitted in percent, `0` when nothing was
/// fitted.
pub fn variance_percent(actual: f64, fitted: f64) -> i64 {
    if fitted == 0.0 {
        return 0;
    }
    round_half_up((actual - fitted) / fitted * 100.0)
}

// ---------------------------------------------------------------------------
// Period aggregation
// ---------------------------------------------------------------------------

/// Summed numeric fields of every row that fell into one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodTotals {
    pub actual: f64,
    pub fitted: f64,
    pub forecast: f64,
    pub rows: usize,
}

impl PeriodTotals {
    pub fn add_row(&mut self, row: &ForecastRow) {
        self.actual += row.actual;
        self.fitted += row.fitted;
        self.forecast += row.forecast;
        self.rows += 1;
    }

    pub fn accuracy(&self) -> i64 {
        compute_accuracy(self.actual, self.fitted)
    }

    pub fn variance(&self) -> f64 {
        self.actual - self.fitted
    }
}

impl AddAssign for PeriodTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.actual += rhs.actual;
        self.fitted += rhs.fitted;
        self.forecast += rhs.forecast;
        self.rows += rhs.rows;
    }
}

impl Add for PeriodTotals {
    type Output = PeriodTotals;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

/// Group rows by `key_fn` and sum each group. Rows whose key is `None`
/// (typically an unparseable `Month`) are skipped.
pub fn aggregate_by_period<K, F>(rows: &[ForecastRow], key_fn: F) -> BTreeMap<K, PeriodTotals>
where
    K: Ord,
    F: Fn(&ForecastRow) -> Option<K>,
{
    let mut buckets: BTreeMap<K, PeriodTotals> = BTreeMap::new();
    for row in rows {
        if let Some(key) = key_fn(row) {
            buckets.entry(key).or_default().add_row(row);
        }
    }
    buckets
}

/// Sum two aggregates key by key.
pub fn merge_aggregates<K: Ord>(
    mut into: BTreeMap<K, PeriodTotals>,
    other: BTreeMap<K, PeriodTotals>,
) -> BTreeMap<K, PeriodTotals> {
    for (key, totals) in other {
        *into.entry(key).or_default() += totals;
    }
    into
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(pub i32);

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearQuarter {
    pub year: i32,
    pub quarter: u32,
}

impl fmt::Display for YearQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

pub fn by_year(rows: &[ForecastRow]) -> BTreeMap<Year, PeriodTotals> {
    aggregate_by_period(rows, |r| r.period.map(|p| Year(p.year)))
}

pub fn by_quarter(rows: &[ForecastRow]) -> BTreeMap<YearQuarter, PeriodTotals> {
    aggregate_by_period(rows, |r| {
        r.period.map(|p| YearQuarter {
            year: p.year,
            quarter: p.quarter(),
        })
    })
}

pub fn by_month(rows: &[ForecastRow]) -> BTreeMap<Period, PeriodTotals> {
    aggregate_by_period(rows, |r| r.period)
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// One x-axis position of the forecast line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub actual: f64,
    pub fitted: f64,
    pub forecast: f64,
    /// Set on the point that joins the fitted line to the forecast line.
    pub is_connection: bool,
}

/// Flatten an aggregate into chart points, in key order.
pub fn chart_series<K: fmt::Display>(totals: &BTreeMap<K, PeriodTotals>) -> Vec<ChartPoint> {
    totals
        .iter()
        .map(|(key, t)| ChartPoint {
            label: key.to_string(),
            actual: t.actual,
            fitted: t.fitted,
            forecast: t.forecast,
            is_connection: false,
        })
        .collect()
}

/// Join the fitted history to the forecast horizon.
///
/// The last fitted point before a pure-forecast point gets `forecast =
/// fitted` so the two lines meet. Returns the index of that point.
pub fn bridge_forecast(series: &mut [ChartPoint]) -> Option<usize> {
    if !series.iter().any(|p| p.forecast > 0.0) {
        return None;
    }
    let idx = series.windows(2).position(|w| {
        let (cur, next) = (&w[0], &w[1]);
        cur.fitted > 0.0 && next.forecast > 0.0 && next.fitted == 0.0 && next.actual == 0.0
    })?;
    let point = &mut series[idx];
    point.forecast = point.fitted;
    point.is_connection = true;
    Some(idx)
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSummary {
    pub row_count: usize,
    pub total_forecast: f64,
    /// Mean of the exported `Accuracy` column over all filtered rows.
    pub average_accuracy: f64,
    pub has_fitted: bool,
    /// Fitted total of the most recent month that has one.
    pub latest_fitted: f64,
    /// Forecast total of the earliest month that has one.
    pub first_forecast: f64,
}

impl ForecastSummary {
    pub fn compute(rows: &[ForecastRow]) -> Self {
        let total_forecast = rows.iter().map(|r| r.forecast).sum();
        let average_accuracy = if rows.is_empty() {
            0.0
        } else {
            rows.iter().map(|r| r.accuracy).sum::<f64>() / rows.len() as f64
        };

        let months = by_month(rows);
        let latest_fitted = months
            .values()
            .rev()
            .find(|t| t.fitted > 0.0)
            .map(|t| t.fitted);
        let first_forecast = months
            .values()
            .find(|t| t.forecast > 0.0)
            .map(|t| t.forecast)
            .unwrap_or(0.0);

        ForecastSummary {
            row_count: rows.len(),
            total_forecast,
            average_accuracy,
            has_fitted: latest_fitted.is_some(),
            latest_fitted: latest_fitted.unwrap_or(0.0),
            first_forecast,
        }
    }

    /// Headline value card: latest fitted when there is history, otherwise
    /// the first forecast.
    pub fn headline(&self) -> (&'static str, f64) {
        if self.has_fitted {
            ("Latest Forecast", self.latest_fitted)
        } else {
            ("Forecast", self.first_forecast)
        }
    }
}

// ---------------------------------------------------------------------------
// SKU performance and top-N ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SkuPerformance {
    pub sku: String,
    pub product: String,
    pub actual: f64,
    pub fitted: f64,
    pub forecast: f64,
    pub accuracy: i64,
    pub variance: f64,
    pub variance_percent: i64,
    /// Distinct depots, first-seen order.
    pub depots: Vec<String>,
}

impl SkuPerformance {
    pub fn depots_label(&self) -> String {
        self.depots.join(", ")
    }

    fn matches_query(&self, query: &str) -> bool {
        self.sku.to_lowercase().contains(query)
            || self.product.to_lowercase().contains(query)
            || self.depots_label().to_lowercase().contains(query)
    }
}

/// Aggregate rows per SKU and derive accuracy and variance.
///
/// SKUs with neither actual nor fitted volume are dropped, as are SKUs
/// that have both but score an accuracy of exactly zero.
pub fn sku_performance(rows: &[ForecastRow]) -> Vec<SkuPerformance> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut skus: Vec<SkuPerformance> = Vec::new();

    for row in rows {
        if row.sku.is_empty() {
            continue;
        }
        let i = *index.entry(row.sku.as_str()).or_insert_with(|| {
            skus.push(SkuPerformance {
                sku: row.sku.clone(),
                product: row.product.clone(),
                actual: 0.0,
                fitted: 0.0,
                forecast: 0.0,
                accuracy: 0,
                variance: 0.0,
                variance_percent: 0,
                depots: Vec::new(),
            });
            skus.len() - 1
        });
        let entry = &mut skus[i];
        entry.actual += row.actual;
        entry.fitted += row.fitted;
        entry.forecast += row.forecast;
        let depot = if row.depot.is_empty() { "Unknown" } else { row.depot.as_str() };
        if !entry.depots.iter().any(|d| d == depot) {
            entry.depots.push(depot.to_string());
        }
    }

    skus.into_iter()
        .filter(|s| !(s.actual == 0.0 && s.fitted == 0.0))
        .map(|mut s| {
            s.accuracy = compute_accuracy(s.actual, s.fitted);
            s.variance = s.actual - s.fitted;
            s.variance_percent = variance_percent(s.actual, s.fitted);
            s
        })
        .filter(|s| {
            (s.actual > 0.0 || s.fitted > 0.0)
                && !(s.actual > 0.0 && s.fitted > 0.0 && s.accuracy == 0)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Sku,
    Product,
    Actual,
    Fitted,
    Forecast,
    Accuracy,
    VariancePercent,
    Depots,
    DepotsCount,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            SortField::Sku => "SKU",
            SortField::Product => "Product",
            SortField::Actual => "Actual",
            SortField::Fitted => "Fitted",
            SortField::Forecast => "Forecast",
            SortField::Accuracy => "Accuracy",
            SortField::VariancePercent => "Variance %",
            SortField::Depots => "Depots",
            SortField::DepotsCount => "Depot count",
        }
    }

    fn compare(self, a: &SkuPerformance, b: &SkuPerformance) -> Ordering {
        fn text(a: &str, b: &str) -> Ordering {
            a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
        }
        match self {
            SortField::Sku => text(&a.sku, &b.sku),
            SortField::Product => text(&a.product, &b.product),
            SortField::Depots => text(&a.depots_label(), &b.depots_label()),
            SortField::Actual => a.actual.total_cmp(&b.actual),
            SortField::Fitted => a.fitted.total_cmp(&b.fitted),
            SortField::Forecast => a.forecast.total_cmp(&b.forecast),
            SortField::Accuracy => a.accuracy.cmp(&b.accuracy),
            SortField::VariancePercent => a.variance_percent.cmp(&b.variance_percent),
            SortField::DepotsCount => a.depots.len().cmp(&b.depots.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Column sort state of the top-SKU table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            field: SortField::Actual,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Header click: the active column flips, a new column starts descending.
    pub fn click(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }
}

/// Pick the `n` SKUs with the largest actual volume, then order those by
/// `field`.
///
/// Selection always happens on volume: sorting by accuracy never pulls a
/// low-volume SKU into the table.
pub fn rank_top_n(
    mut skus: Vec<SkuPerformance>,
    n: usize,
    field: SortField,
    direction: SortDirection,
) -> Vec<SkuPerformance> {
    skus.sort_by(|a, b| b.actual.total_cmp(&a.actual));
    skus.truncate(n);
    skus.sort_by(|a, b| {
        let ord = field.compare(a, b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    skus
}

/// Outcome of the top-performing SKU table.
#[derive(Debug, Clone, PartialEq)]
pub enum TopSkus {
    Ranked(Vec<SkuPerformance>),
    /// Nothing with volume under the current filters.
    NoData,
    /// Data exists but the search query excluded all of it.
    NoMatches,
}

pub fn top_performing(rows: &[ForecastRow], query: &str, n: usize, sort: SortState) -> TopSkus {
    let has_volume = rows
        .iter()
        .any(|r| r.actual > 0.0 || r.fitted > 0.0 || r.forecast > 0.0);
    if !has_volume {
        return TopSkus::NoData;
    }

    let skus = sku_performance(rows);
    if skus.is_empty() {
        return TopSkus::NoData;
    }

    let query = query.trim().to_lowercase();
    let skus: Vec<SkuPerformance> = if query.is_empty() {
        skus
    } else {
        skus.into_iter().filter(|s| s.matches_query(&query)).collect()
    };
    if skus.is_empty() {
        return TopSkus::NoMatches;
    }

    TopSkus::Ranked(rank_top_n(skus, n, sort.field, sort.direction))
}

// ---------------------------------------------------------------------------
// Month-wise accuracy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthAccuracy {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub average_accuracy: f64,
    pub count: usize,
}

impl MonthAccuracy {
    pub fn band(&self) -> AccuracyBand {
        AccuracyBand::from_value(self.average_accuracy)
    }
}

/// Average exported accuracy per month.
///
/// With `all_years` each (year, month) gets its own entry; otherwise months
/// are pooled across whatever years remain in `rows`. Rows lacking a period
/// or an accuracy cell are ignored.
pub fn month_wise_accuracy(rows: &[ForecastRow], all_years: bool) -> Vec<MonthAccuracy> {
    let mut buckets: BTreeMap<i64, MonthAccuracy> = BTreeMap::new();
    for row in rows {
        let Some(period) = row.period else { continue };
        if !row.has_accuracy {
            continue;
        }
        let (key, label) = if all_years {
            (period.year as i64 * 100 + period.month as i64, period.to_string())
        } else {
            (period.month as i64, period.month_name().to_string())
        };
        let entry = buckets.entry(key).or_insert_with(|| MonthAccuracy {
            label,
            year: period.year,
            month: period.month,
            average_accuracy: 0.0,
            count: 0,
        });
        // Running sum; divided once all rows are in.
        entry.average_accuracy += row.accuracy;
        entry.count += 1;
    }
    buckets
        .into_values()
        .map(|mut m| {
            m.average_accuracy /= m.count as f64;
            m
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AccuracyBand {
    pub fn from_value(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            AccuracyBand::Excellent
        } else if accuracy >= 80.0 {
            AccuracyBand::Good
        } else if accuracy >= 70.0 {
            AccuracyBand::Fair
        } else {
            AccuracyBand::Poor
        }
    }
}

/// A sliding window over the month-wise accuracy strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: usize,
    pub count: usize,
}

impl MonthWindow {
    pub fn new(count: usize) -> Self {
        MonthWindow {
            start: 0,
            count: count.max(1),
        }
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start.min(items.len());
        let end = (start + self.count).min(items.len());
        &items[start..end]
    }

    pub fn can_prev(&self) -> bool {
        self.start > 0
    }

    pub fn can_next(&self, len: usize) -> bool {
        self.start + self.count < len
    }

    pub fn prev(&mut self) {
        self.start = self.start.saturating_sub(1);
    }

    pub fn next(&mut self, len: usize) {
        if self.can_next(len) {
            self.start += 1;
        }
    }

    pub fn reset(&mut self) {
        self.start = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sku: &str, depot: &str, month: &str, actual: f64, fitted: f64, forecast: f64) -> ForecastRow {
        ForecastRow {
            product: "Wire".into(),
            sku: sku.into(),
            depot: depot.into(),
            month: month.into(),
            period: Period::parse(month),
            actual,
            fitted,
            forecast,
            accuracy: compute_accuracy(actual, fitted) as f64,
            has_accuracy: true,
        }
    }

    #[test]
    fn accuracy_short_circuits_on_zero_fitted() {
        assert_eq!(compute_accuracy(0.0, 0.0), 0);
        assert_eq!(compute_accuracy(500.0, 0.0), 0);
        assert_eq!(variance_percent(500.0, 0.0), 0);
    }

    #[test]
    fn accuracy_formula_and_rounding() {
        assert_eq!(compute_accuracy(150.0, 120.0), 75);
        assert_eq!(compute_accuracy(100.0, 100.0), 100);
        // 1 - 300/100 = -2 → -200
        assert_eq!(compute_accuracy(400.0, 100.0), -200);
        assert_eq!(variance_percent(150.0, 120.0), 25);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
    }

    #[test]
    fn sku_example_aggregates_to_75_percent() {
        let rows = vec![
            row("A", "North", "01-01-2023", 100.0, 80.0, 0.0),
            row("A", "North", "02-01-2023", 50.0, 40.0, 0.0),
        ];
        let skus = sku_performance(&rows);
        assert_eq!(skus.len(), 1);
        assert_eq!(skus[0].actual, 150.0);
        assert_eq!(skus[0].fitted, 120.0);
        assert_eq!(skus[0].accuracy, 75);
        assert_eq!(skus[0].variance, 30.0);
        assert_eq!(skus[0].depots, vec!["North"]);
    }

    #[test]
    fn sku_performance_drops_empty_and_zero_accuracy() {
        let rows = vec![
            row("EMPTY", "N", "01-01-2023", 0.0, 0.0, 10.0),
            // 1 - 200/100 = -1 → -100, kept (only exact zero is dropped)
            row("NEG", "N", "01-01-2023", 300.0, 100.0, 0.0),
            // 1 - 100/100 = 0 → dropped
            row("ZERO", "N", "01-01-2023", 200.0, 100.0, 0.0),
            row("", "N", "01-01-2023", 5.0, 5.0, 0.0),
            row("OK", "", "01-01-2023", 10.0, 10.0, 0.0),
        ];
        let skus = sku_performance(&rows);
        let names: Vec<&str> = skus.iter().map(|s| s.sku.as_str()).collect();
        assert_eq!(names, vec!["NEG", "OK"]);
        assert_eq!(skus[1].depots, vec!["Unknown"]);
    }

    #[test]
    fn period_buckets_skip_unparseable_months() {
        let rows = vec![
            row("A", "N", "01-01-2023", 10.0, 8.0, 0.0),
            row("A", "N", "05-01-2023", 20.0, 18.0, 0.0),
            row("A", "N", "11-01-2024", 30.0, 0.0, 40.0),
            row("A", "N", "someday", 99.0, 99.0, 99.0),
        ];
        let years = by_year(&rows);
        assert_eq!(years.len(), 2);
        assert_eq!(years[&Year(2023)].actual, 30.0);
        assert_eq!(years[&Year(2023)].rows, 2);

        let quarters = by_quarter(&rows);
        let labels: Vec<String> = quarters.keys().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["2023-Q1", "2023-Q2", "2024-Q4"]);

        assert_eq!(by_month(&rows).len(), 3);
    }

    #[test]
    fn aggregation_is_associative_over_partitions() {
        let rows = vec![
            row("A", "N", "01-01-2023", 10.0, 8.0, 1.0),
            row("B", "S", "01-01-2023", 5.0, 4.0, 2.0),
            row("A", "N", "04-01-2023", 7.0, 6.0, 3.0),
            row("C", "E", "04-01-2024", 3.0, 2.0, 4.0),
            row("A", "N", "bad", 1.0, 1.0, 1.0),
        ];
        let whole = by_quarter(&rows);
        let (left, right) = rows.split_at(2);
        let merged = merge_aggregates(by_quarter(left), by_quarter(right));
        assert_eq!(whole, merged);
    }

    fn perf(sku: &str, actual: f64, accuracy: i64) -> SkuPerformance {
        SkuPerformance {
            sku: sku.into(),
            product: "P".into(),
            actual,
            fitted: actual,
            forecast: 0.0,
            accuracy,
            variance: 0.0,
            variance_percent: 0,
            depots: vec!["N".into()],
        }
    }

    #[test]
    fn rank_selects_by_volume_before_resorting() {
        let skus = vec![
            perf("big-low", 1000.0, 10),
            perf("small-high", 1.0, 99),
            perf("mid", 500.0, 50),
        ];
        let out = rank_top_n(skus, 2, SortField::Accuracy, SortDirection::Desc);
        let names: Vec<&str> = out.iter().map(|s| s.sku.as_str()).collect();
        // small-high has the best accuracy but not the volume to qualify.
        assert_eq!(names, vec!["mid", "big-low"]);

        let skus: Vec<SkuPerformance> = (0..25).map(|i| perf(&format!("S{i}"), i as f64, 0)).collect();
        let out = rank_top_n(skus, 10, SortField::Sku, SortDirection::Asc);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|s| s.actual >= 15.0));
    }

    #[test]
    fn rank_by_depot_count() {
        let mut wide = perf("wide", 10.0, 0);
        wide.depots = vec!["N".into(), "S".into(), "W".into()];
        let mut pair = perf("pair", 20.0, 0);
        pair.depots = vec!["E".into(), "N".into()];
        let skus = vec![perf("single", 30.0, 0), wide, pair];

        let out = rank_top_n(skus.clone(), 3, SortField::DepotsCount, SortDirection::Desc);
        let names: Vec<&str> = out.iter().map(|s| s.sku.as_str()).collect();
        assert_eq!(names, vec!["wide", "pair", "single"]);

        let out = rank_top_n(skus, 3, SortField::DepotsCount, SortDirection::Asc);
        assert_eq!(out[0].sku, "single");
        assert_eq!(SortField::DepotsCount.label(), "Depot count");
    }

    #[test]
    fn sort_state_toggles() {
        let mut sort = SortState::default();
        sort.click(SortField::Actual);
        assert_eq!(sort.direction, SortDirection::Asc);
        sort.click(SortField::Sku);
        assert_eq!(sort, SortState { field: SortField::Sku, direction: SortDirection::Desc });
    }

    #[test]
    fn top_performing_reports_empty_states() {
        let idle = vec![row("A", "N", "01-01-2023", 0.0, 0.0, 0.0)];
        assert_eq!(top_performing(&idle, "", 10, SortState::default()), TopSkus::NoData);

        let rows = vec![
            row("W-1", "North", "01-01-2023", 100.0, 90.0, 0.0),
            row("L-7", "East", "01-01-2023", 40.0, 50.0, 0.0),
        ];
        assert_eq!(top_performing(&rows, "zzz", 10, SortState::default()), TopSkus::NoMatches);
        match top_performing(&rows, "EAST", 10, SortState::default()) {
            TopSkus::Ranked(skus) => {
                assert_eq!(skus.len(), 1);
                assert_eq!(skus[0].sku, "L-7");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn summary_picks_latest_fitted_and_first_forecast() {
        let rows = vec![
            row("A", "N", "01-01-2023", 10.0, 8.0, 0.0),
            row("A", "N", "02-01-2023", 12.0, 11.0, 0.0),
            row("A", "N", "03-01-2023", 0.0, 0.0, 15.0),
            row("A", "N", "04-01-2023", 0.0, 0.0, 16.0),
        ];
        let s = ForecastSummary::compute(&rows);
        assert_eq!(s.total_forecast, 31.0);
        assert!(s.has_fitted);
        assert_eq!(s.latest_fitted, 11.0);
        assert_eq!(s.first_forecast, 15.0);
        assert_eq!(s.headline(), ("Latest Forecast", 11.0));

        let empty = ForecastSummary::compute(&[]);
        assert_eq!(empty.average_accuracy, 0.0);
        assert_eq!(empty.headline(), ("Forecast", 0.0));
    }

    #[test]
    fn bridge_joins_fitted_to_forecast() {
        let rows = vec![
            row("A", "N", "01-01-2023", 10.0, 8.0, 0.0),
            row("A", "N", "02-01-2023", 12.0, 11.0, 0.0),
            row("A", "N", "03-01-2023", 0.0, 0.0, 15.0),
        ];
        let mut series = chart_series(&by_month(&rows));
        assert_eq!(series[0].label, "January 2023");
        assert_eq!(bridge_forecast(&mut series), Some(1));
        assert!(series[1].is_connection);
        assert_eq!(series[1].forecast, 11.0);

        let mut history_only = chart_series(&by_month(&rows[..2]));
        assert_eq!(bridge_forecast(&mut history_only), None);
    }

    #[test]
    fn month_wise_accuracy_groups_by_year_only_when_asked() {
        let mut rows = vec![
            row("A", "N", "01-01-2023", 90.0, 100.0, 0.0),
            row("B", "N", "01-01-2023", 70.0, 100.0, 0.0),
            row("A", "N", "01-01-2024", 100.0, 100.0, 0.0),
            row("A", "N", "bad", 1.0, 1.0, 0.0),
        ];
        rows.push(ForecastRow {
            has_accuracy: false,
            ..row("C", "N", "02-01-2023", 1.0, 1.0, 0.0)
        });

        let split = month_wise_accuracy(&rows, true);
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].label, "January 2023");
        assert_eq!(split[0].average_accuracy, 80.0);
        assert_eq!(split[0].count, 2);
        assert_eq!(split[0].band(), AccuracyBand::Good);

        let pooled = month_wise_accuracy(&rows, false);
        assert_eq!(pooled.len(), 1);
        assert_eq!(pooled[0].label, "January");
        assert_eq!(pooled[0].count, 3);
    }

    #[test]
    fn month_window_stays_in_bounds() {
        let items: Vec<u32> = (0..6).collect();
        let mut w = MonthWindow::new(4);
        assert_eq!(w.visible(&items), &[0, 1, 2, 3]);
        assert!(!w.can_prev());
        w.next(items.len());
        w.next(items.len());
        w.next(items.len());
        assert_eq!(w.start, 2);
        assert_eq!(w.visible(&items), &[2, 3, 4, 5]);
        w.prev();
        w.prev();
        w.prev();
        assert_eq!(w.start, 0);
        assert!(w.visible(&items[..0]).is_empty());
    }
}
